//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod download;
pub mod premium;
pub mod report;
pub mod simulate;

use infra_config::FrontConfig;
use view_dashboard::{dashboard_document, ApiClient, Dashboard, DirectorySink, LogNotifier};

use crate::Result;

/// Dashboard on the default page, reporting errors to the log and saving
/// downloads into the configured directory
pub(crate) fn open_dashboard(config: &FrontConfig) -> Result<Dashboard<LogNotifier, DirectorySink>> {
    let client = ApiClient::from_config(config)?;
    let dashboard = Dashboard::new(
        client,
        dashboard_document(),
        LogNotifier,
        DirectorySink::new(config.download_dir.clone()),
    )?;
    Ok(dashboard)
}
