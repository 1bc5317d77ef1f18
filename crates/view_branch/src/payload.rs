use serde::Serialize;
use serde_json::{Map, Value};

use crate::branch::Branch;

/// Body of a premium calculation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PremiumPayload {
    /// Calculation type label of the active branch
    #[serde(rename = "type")]
    pub calculation_type: String,
    /// Submitted field values keyed by field name
    pub parameters: Map<String, Value>,
}

impl PremiumPayload {
    /// Build the payload from submitted name/value pairs.
    ///
    /// The hidden branch field is dropped (it is carried by `type`) and a
    /// checked checkbox is sent as `true`.
    pub fn from_fields(branch: Branch, fields: Vec<(String, String)>) -> Self {
        let mut parameters = Map::new();
        for (name, value) in fields {
            if name == "insuranceBranch" {
                continue;
            }
            let value = match value.as_str() {
                "on" => Value::Bool(true),
                _ => Value::String(value),
            };
            parameters.insert(name, value);
        }

        Self {
            calculation_type: branch.calculation_type().to_string(),
            parameters,
        }
    }
}
