use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Insurance product line selectable on the premium form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// Life insurance
    Vie,
    /// Non-life insurance
    NonVie,
    /// Mandatory insurance
    Obligatoire,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown insurance branch: {0}. Supported: vie, non_vie, obligatoire")]
pub struct UnknownBranch(pub String);

impl Branch {
    pub const ALL: [Branch; 3] = [Branch::Vie, Branch::NonVie, Branch::Obligatoire];

    /// Value carried by `data-branch` and the hidden branch field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vie => "vie",
            Self::NonVie => "non_vie",
            Self::Obligatoire => "obligatoire",
        }
    }

    /// Id of the form section holding this branch's fields
    pub fn section_id(&self) -> String {
        format!("{}-section", self.as_str())
    }

    /// Calculation type label expected by the premium endpoint
    pub fn calculation_type(&self) -> &'static str {
        match self {
            Self::Vie => "Assurance Vie",
            Self::NonVie => "Assurance Non-Vie",
            Self::Obligatoire => "Assurance Obligatoire",
        }
    }
}

impl FromStr for Branch {
    type Err = UnknownBranch;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "vie" => Ok(Self::Vie),
            "non_vie" => Ok(Self::NonVie),
            "obligatoire" => Ok(Self::Obligatoire),
            other => Err(UnknownBranch(other.to_string())),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
