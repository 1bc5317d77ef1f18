//! CLI error types

use thiserror::Error;

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] infra_config::ConfigError),

    #[error("Page binding error: {0}")]
    Binding(#[from] view_dom::BindingError),

    #[error("Dashboard error: {0}")]
    Dashboard(#[from] view_dashboard::DashboardError),

    #[error("API error: {0}")]
    Api(#[from] view_dashboard::ApiError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Backend unavailable at {0}")]
    BackendUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// CLI result type
pub type Result<T> = std::result::Result<T, CliError>;
