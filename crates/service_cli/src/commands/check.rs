//! Check command implementation
//!
//! Prints the effective configuration, validates the page templates and
//! checks that the simulation API answers.

use infra_config::FrontConfig;
use tracing::{info, warn};
use view_branch::{premium_form_document, BranchSelector};
use view_dashboard::{dashboard_document, ApiClient, Dashboard, MemorySink, RecordingNotifier};

use crate::{CliError, Result};

/// Run the check command
pub async fn run(config: &FrontConfig) -> Result<()> {
    info!("Checking configuration...");
    println!("base_url        = {}", config.base_url);
    println!("log_level       = {}", config.log_level);
    println!(
        "request_timeout = {}",
        config
            .request_timeout_secs
            .map(|secs| format!("{}s", secs))
            .unwrap_or_else(|| "none".to_string())
    );
    println!("download_dir    = {}", config.download_dir.display());

    BranchSelector::init(premium_form_document())?;
    let client = ApiClient::from_config(config)?;
    Dashboard::new(
        client.clone(),
        dashboard_document(),
        RecordingNotifier::new(),
        MemorySink::default(),
    )?;
    println!("templates       = ok");

    if client.health().await {
        println!("backend         = ok");
        Ok(())
    } else {
        warn!(base_url = %config.base_url, "Simulation API is not reachable");
        println!("backend         = unreachable");
        Err(CliError::BackendUnavailable(config.base_url.clone()))
    }
}
