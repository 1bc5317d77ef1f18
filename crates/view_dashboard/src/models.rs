//! View-model types exchanged with the simulation API.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Identifier sent by the API as either a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl EntityId {
    /// Loose comparison against a form value
    pub fn matches(&self, raw: &str) -> bool {
        self.to_string() == raw.trim()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

/// Numeric only when the text is the canonical form of the number, so
/// `"007"` stays textual and renders back unchanged.
impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        let raw = s.trim();
        match raw.parse::<i64>() {
            Ok(n) if n.to_string() == raw => Self::Number(n),
            _ => Self::Text(raw.to_string()),
        }
    }
}

/// Portfolio selectable as simulation input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: EntityId,
    pub name: String,
    pub total_value: f64,
}

/// Stress or market scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown simulation type: '{0}'. Supported: market-risk, credit-risk, stress-test, liquidity-risk")]
pub struct UnknownSimulationType(pub String);

/// Kind of simulation the backend runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimulationType {
    MarketRisk,
    CreditRisk,
    StressTest,
    LiquidityRisk,
}

impl SimulationType {
    pub const ALL: [SimulationType; 4] = [
        SimulationType::MarketRisk,
        SimulationType::CreditRisk,
        SimulationType::StressTest,
        SimulationType::LiquidityRisk,
    ];

    /// Path segment of `POST /simulations/{type}`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarketRisk => "market-risk",
            Self::CreditRisk => "credit-risk",
            Self::StressTest => "stress-test",
            Self::LiquidityRisk => "liquidity-risk",
        }
    }

    /// Display label used in the simulation form
    pub fn label(&self) -> &'static str {
        match self {
            Self::MarketRisk => "Risque de marché",
            Self::CreditRisk => "Risque de crédit",
            Self::StressTest => "Stress test",
            Self::LiquidityRisk => "Risque de liquidité",
        }
    }
}

impl FromStr for SimulationType {
    type Err = UnknownSimulationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| UnknownSimulationType(s.to_string()))
    }
}

impl fmt::Display for SimulationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a market risk (VaR) simulation.
///
/// A field the form could not parse is sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRiskParameters {
    pub confidence_level: Option<f64>,
    pub time_horizon: Option<i64>,
    pub method: String,
}

/// Type-specific simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SimulationParameters {
    MarketRisk(MarketRiskParameters),
    /// Types without form parameters serialise as `{}`
    Empty {},
}

/// Body of `POST /simulations/{type}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    #[serde(rename = "type")]
    pub simulation_type: SimulationType,
    pub portfolio: Option<Portfolio>,
    pub parameters: SimulationParameters,
    pub scenarios: Vec<Scenario>,
}

/// Share of the portfolio in one asset class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub label: String,
    pub value: f64,
}

/// Loss of the portfolio under one stress scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressOutcome {
    pub scenario: String,
    pub loss: f64,
}

/// Metrics block of a simulation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    pub portfolio_value: f64,
    pub max_loss: f64,
    pub most_severe_scenario: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_95: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_shortfall: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_test_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scr: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allocation: Vec<AllocationSlice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stress_tests: Vec<StressOutcome>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SimulationMetrics {
    /// Metrics with only the mandatory fields set
    pub fn new(portfolio_value: f64, max_loss: f64, most_severe_scenario: impl Into<String>) -> Self {
        Self {
            portfolio_value,
            max_loss,
            most_severe_scenario: most_severe_scenario.into(),
            var_95: None,
            expected_shortfall: None,
            stress_test_max: None,
            scr: None,
            allocation: Vec::new(),
            stress_tests: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Response of `POST /simulations/{type}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub simulation_type: Option<String>,
    pub results: SimulationMetrics,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SimulationResult {
    pub fn new(results: SimulationMetrics) -> Self {
        Self {
            id: None,
            simulation_type: None,
            results,
            extra: Map::new(),
        }
    }
}

/// Entry of the recent simulations list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub simulation_type: String,
    pub portfolio_name: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: Option<String>,
}

/// RFC 3339 timestamp, or an ISO 8601 one without offset read as UTC
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc()))
        .map_err(serde::de::Error::custom)
}

/// Leading decimal number of a form value, or `None` when there is none
pub fn parse_float(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let end = s
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    (1..=end)
        .rev()
        .filter(|i| s.is_char_boundary(*i))
        .find_map(|i| s[..i].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Leading integer of a form value (`"10.5"` is `10`)
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let digits_start = usize::from(s.starts_with('+') || s.starts_with('-'));
    let digits = s[digits_start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    s[..digits_start + digits].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_id_accepts_numbers_and_strings() {
        let p: Portfolio =
            serde_json::from_value(json!({"id": 7, "name": "Core", "total_value": 1.0})).unwrap();
        assert_eq!(p.id, EntityId::Number(7));
        assert!(p.id.matches("7"));

        let s: Scenario = serde_json::from_value(json!({"id": "crisis-2008", "name": "Crise"})).unwrap();
        assert_eq!(s.id, EntityId::Text("crisis-2008".to_string()));
        assert!(!s.is_default);
        assert!(s.description.is_empty());
    }

    #[test]
    fn test_entity_id_from_form_text_keeps_its_form() {
        assert_eq!(EntityId::from("12"), EntityId::Number(12));
        assert_eq!(EntityId::from("-3"), EntityId::Number(-3));
        assert_eq!(EntityId::from("007"), EntityId::Text("007".to_string()));
        assert_eq!(EntityId::from("+5"), EntityId::Text("+5".to_string()));
        assert_eq!(EntityId::from(" sim-1 "), EntityId::Text("sim-1".to_string()));
        for raw in ["12", "007", "sim-1"] {
            assert_eq!(EntityId::from(raw).to_string(), raw);
        }
    }

    #[test]
    fn test_request_serialisation() {
        let request = SimulationRequest {
            simulation_type: SimulationType::MarketRisk,
            portfolio: None,
            parameters: SimulationParameters::MarketRisk(MarketRiskParameters {
                confidence_level: Some(0.99),
                time_horizon: None,
                method: "historical".to_string(),
            }),
            scenarios: vec![],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "type": "market-risk",
                "portfolio": null,
                "parameters": {"confidence_level": 0.99, "time_horizon": null, "method": "historical"},
                "scenarios": []
            })
        );
    }

    #[test]
    fn test_empty_parameters_serialise_as_object() {
        assert_eq!(
            serde_json::to_value(SimulationParameters::Empty {}).unwrap(),
            json!({})
        );
        let parsed: SimulationParameters = serde_json::from_value(json!({})).unwrap();
        assert_eq!(parsed, SimulationParameters::Empty {});
    }

    #[test]
    fn test_result_keeps_unknown_fields() {
        let result: SimulationResult = serde_json::from_value(json!({
            "id": 42,
            "status": "completed",
            "results": {
                "portfolio_value": 100000.0,
                "max_loss": 25000.0,
                "most_severe_scenario": "Krach boursier",
                "var_95": 12000.0,
                "duration_ms": 850
            }
        }))
        .unwrap();

        assert_eq!(result.id, Some(EntityId::Number(42)));
        assert_eq!(result.extra["status"], "completed");
        assert_eq!(result.results.var_95, Some(12000.0));
        assert_eq!(result.results.extra["duration_ms"], 850);
        assert!(result.results.allocation.is_empty());
    }

    #[test]
    fn test_summary_timestamps_with_and_without_offset() {
        let summary = |created_at: &str| {
            serde_json::from_value::<SimulationSummary>(json!({
                "id": 1,
                "type": "market-risk",
                "portfolio_name": "Core",
                "created_at": created_at
            }))
        };
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(14, 7, 0))
            .unwrap()
            .and_utc();

        assert_eq!(summary("2024-03-05T14:07:00Z").unwrap().created_at, expected);
        assert_eq!(summary("2024-03-05T15:07:00+01:00").unwrap().created_at, expected);
        assert_eq!(summary("2024-03-05T14:07:00").unwrap().created_at, expected);
        assert_eq!(
            summary("2024-03-05T14:07:00.250000").unwrap().created_at,
            expected + chrono::Duration::milliseconds(250)
        );
        assert!(summary("hier").is_err());
    }

    #[test]
    fn test_simulation_type_parsing() {
        assert_eq!(
            "stress-test".parse::<SimulationType>().unwrap(),
            SimulationType::StressTest
        );
        assert!("monte-carlo".parse::<SimulationType>().is_err());
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float("0.99"), Some(0.99));
        assert_eq!(parse_float(" 0.95abc"), Some(0.95));
        assert_eq!(parse_float("1e-2"), Some(0.01));
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_float(""), None);
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int("10"), Some(10));
        assert_eq!(parse_int("10.5"), Some(10));
        assert_eq!(parse_int("-3 days"), Some(-3));
        assert_eq!(parse_int("jours"), None);
        assert_eq!(parse_int("-"), None);
    }
}
