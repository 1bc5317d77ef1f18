//! # view_dashboard: Risk Simulation Dashboard
//!
//! Controller of the risk simulation dashboard page. It loads portfolios and
//! scenarios from the simulation API, submits simulation requests and renders
//! results, charts, reports and the recent simulation history into a
//! [`view_dom::Document`].
//!
//! ## Layout
//!
//! - [`models`]: API payloads (`Portfolio`, `Scenario`, `SimulationRequest`, ...)
//! - [`api_client`]: `reqwest` client for the JSON API
//! - [`view_state`]: section and results-tab state machine
//! - [`render`]: HTML fragments (results panel, selects, history, report)
//! - [`charts`]: Chart.js configurations
//! - [`notify`]: error notification and download seams
//! - [`controller`]: the [`Dashboard`] tying everything together
//!
//! ## Usage Examples
//!
//! ```rust
//! use view_dashboard::{format_currency, LossRatio};
//!
//! assert_eq!(format_currency(1234.5), "1\u{202F}234,50\u{00A0}€");
//! assert_eq!(LossRatio::compute(25_000.0, 100_000.0).to_string(), "25.00%");
//! ```

pub mod api_client;
pub mod charts;
pub mod controller;
pub mod format;
pub mod models;
pub mod notify;
pub mod render;
pub mod template;
pub mod view_state;

pub use api_client::{ApiClient, ApiError};
pub use charts::DashboardCharts;
pub use controller::{
    messages, Dashboard, DashboardError, DashboardEvent, DashboardModel, DashboardTarget,
};
pub use format::{format_currency, truncate_text, LossRatio};
pub use models::{
    EntityId, Portfolio, Scenario, SimulationRequest, SimulationResult, SimulationSummary,
    SimulationType,
};
pub use notify::{DirectorySink, DownloadSink, LogNotifier, MemorySink, Notifier, RecordingNotifier};
pub use template::dashboard_document;
pub use view_state::{ResultsTab, Section, ViewState};
