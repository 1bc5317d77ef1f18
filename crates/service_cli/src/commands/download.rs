//! Download command implementation
//!
//! Saves the report file of a simulation into the download directory.

use infra_config::FrontConfig;
use tracing::info;
use view_dashboard::EntityId;

use crate::Result;

/// Run the download command
pub async fn run(config: &FrontConfig, id: &str) -> Result<()> {
    let id = EntityId::from(id);
    info!("Downloading report...");
    info!("  Simulation: {}", id);
    info!("  Output directory: {}", config.download_dir.display());

    let mut dashboard = super::open_dashboard(config)?;
    let path = dashboard.download_simulation(&id).await?;
    println!("{}", path.display());

    info!("Download complete");
    Ok(())
}
