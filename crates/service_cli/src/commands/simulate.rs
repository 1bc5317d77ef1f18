//! Simulate command implementation
//!
//! Fills the dashboard's simulation form from the command line, submits it
//! and prints the results.

use infra_config::FrontConfig;
use tracing::{info, warn};
use view_dashboard::charts::RISK_LABELS;
use view_dashboard::{
    format_currency, Dashboard, DirectorySink, LogNotifier, LossRatio, SimulationResult,
    SimulationType,
};
use view_dom::Selector;

use crate::{CliError, Result};

/// Output format of the simulate command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(CliError::InvalidArgument(format!(
                "Unknown output format: {}. Supported: table, json",
                other
            ))),
        }
    }
}

/// Form values given on the command line
#[derive(Debug, Clone, Default)]
pub struct SimulateOptions {
    pub simulation_type: String,
    pub portfolio: Option<String>,
    pub scenarios: Vec<String>,
    pub confidence_level: Option<String>,
    pub time_horizon: Option<String>,
    pub method: Option<String>,
    pub format: String,
}

fn set_field(dashboard: &mut Dashboard<LogNotifier, DirectorySink>, id: &str, value: &str) {
    let doc = dashboard.document_mut();
    match doc.get_by_id(id) {
        Some(field) => doc.set_value(field, value),
        None => warn!(field = id, "Form field not found"),
    }
}

fn fill_form(dashboard: &mut Dashboard<LogNotifier, DirectorySink>, options: &SimulateOptions) {
    set_field(dashboard, "simulation-type", &options.simulation_type);

    let fields = [
        ("portfolio-select", &options.portfolio),
        ("confidence-level", &options.confidence_level),
        ("time-horizon", &options.time_horizon),
        ("var-method", &options.method),
    ];
    for (id, value) in fields {
        if let Some(value) = value {
            set_field(dashboard, id, value);
        }
    }

    if !options.scenarios.is_empty() {
        let doc = dashboard.document_mut();
        let checkboxes = doc.query_all(&Selector::tag("input").and(Selector::name("scenarios")));
        for key in checkboxes {
            let selected = options.scenarios.iter().any(|id| id == doc.value(key));
            doc.set_checked(key, selected);
        }
    }
}

/// Plain-text rendering of a simulation result
pub fn render_summary(result: &SimulationResult) -> String {
    let metrics = &result.results;
    let mut lines = Vec::new();

    let title = match (&result.id, &result.simulation_type) {
        (Some(id), Some(kind)) => format!("Simulation {} ({})", id, kind),
        (Some(id), None) => format!("Simulation {}", id),
        _ => "Simulation".to_string(),
    };
    lines.push(title);
    lines.push(format!("  Valeur du Portefeuille : {}", format_currency(metrics.portfolio_value)));
    lines.push(format!("  Perte Maximale         : {}", format_currency(metrics.max_loss)));
    lines.push(format!("  Scénario le Plus Sévère: {}", metrics.most_severe_scenario));
    lines.push(format!(
        "  Ratio de Perte         : {}",
        LossRatio::compute(metrics.max_loss, metrics.portfolio_value)
    ));

    let risk = [metrics.var_95, metrics.expected_shortfall, metrics.stress_test_max, metrics.scr];
    for (label, value) in RISK_LABELS.iter().zip(risk) {
        if let Some(value) = value {
            lines.push(format!("  {:<23}: {}", label, format_currency(value)));
        }
    }
    for outcome in &metrics.stress_tests {
        lines.push(format!("  - {}: {}", outcome.scenario, format_currency(outcome.loss)));
    }
    lines.join("\n")
}

/// Run the simulate command
pub async fn run(config: &FrontConfig, options: &SimulateOptions) -> Result<()> {
    let format: OutputFormat = options.format.parse()?;
    let simulation_type: SimulationType = options
        .simulation_type
        .parse()
        .map_err(|e: view_dashboard::models::UnknownSimulationType| {
            CliError::InvalidArgument(e.to_string())
        })?;

    info!("Running simulation...");
    info!("  Type: {}", simulation_type);
    info!("  API: {}", config.base_url);

    let mut dashboard = super::open_dashboard(config)?;
    dashboard.init().await;
    fill_form(&mut dashboard, options);

    let result = dashboard.run_simulation().await?;
    match format {
        OutputFormat::Table => println!("{}", render_summary(result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
    }

    info!("Simulation complete");
    Ok(())
}
