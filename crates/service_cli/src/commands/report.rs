//! Report command implementation
//!
//! Fetches the report of a simulation and prints it as JSON.

use infra_config::FrontConfig;
use tracing::info;
use view_dashboard::{ApiClient, EntityId};

use crate::Result;

/// Run the report command
pub async fn run(config: &FrontConfig, id: &str) -> Result<()> {
    let id = EntityId::from(id);
    info!("Fetching report...");
    info!("  Simulation: {}", id);

    let client = ApiClient::from_config(config)?;
    let report = client.fetch_report(&id).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    info!("Report fetched");
    Ok(())
}
