//! Simulation dashboard controller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use view_dom::{BindingError, Bindings, Document, NodeKey, Selector, ViewTarget};

use crate::api_client::{ApiClient, ApiError};
use crate::charts::{allocation_chart, risk_chart, stress_test_chart, ChartJsConfig, DashboardCharts};
use crate::models::{
    parse_float, parse_int, EntityId, MarketRiskParameters, Portfolio, Scenario,
    SimulationParameters, SimulationRequest, SimulationResult, SimulationSummary, SimulationType,
    UnknownSimulationType,
};
use crate::notify::{DownloadSink, Notifier};
use crate::render::{
    portfolio_options, recent_simulation_rows, render_report_modal, render_results_panel,
    scenario_checkboxes,
};
use crate::view_state::{self, ResultsTab, Section, ViewEvent, ViewState};

/// User-facing error messages, one per operation
pub mod messages {
    pub const SIMULATION_ERROR: &str = "Erreur lors de l'exécution de la simulation";
    pub const REPORT_ERROR: &str = "Erreur lors du chargement du rapport";
    pub const DOWNLOAD_ERROR: &str = "Erreur lors du téléchargement";
    pub const LOAD_ERROR: &str = "Erreur lors du chargement des données";
}

/// Attribute holding a chart's JSON config on its canvas
pub const CHART_ATTRIBUTE: &str = "data-chart";

const ACTIVE_CLASS: &str = "active";

/// Elements the dashboard renders into or reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardTarget {
    SimulationForm,
    SimulationType,
    ConfidenceLevel,
    TimeHorizon,
    VarMethod,
    RunButton,
    PortfolioSelect,
    ScenariosContainer,
    AllocationChart,
    RiskChart,
    StressTestChart,
    SimulationResults,
    RecentSimulations,
    ReportModal,
    Loading,
}

impl ViewTarget for DashboardTarget {
    const ALL: &'static [Self] = &[
        DashboardTarget::SimulationForm,
        DashboardTarget::SimulationType,
        DashboardTarget::ConfidenceLevel,
        DashboardTarget::TimeHorizon,
        DashboardTarget::VarMethod,
        DashboardTarget::RunButton,
        DashboardTarget::PortfolioSelect,
        DashboardTarget::ScenariosContainer,
        DashboardTarget::AllocationChart,
        DashboardTarget::RiskChart,
        DashboardTarget::StressTestChart,
        DashboardTarget::SimulationResults,
        DashboardTarget::RecentSimulations,
        DashboardTarget::ReportModal,
        DashboardTarget::Loading,
    ];

    fn element_id(self) -> &'static str {
        match self {
            DashboardTarget::SimulationForm => "simulation-form",
            DashboardTarget::SimulationType => "simulation-type",
            DashboardTarget::ConfidenceLevel => "confidence-level",
            DashboardTarget::TimeHorizon => "time-horizon",
            DashboardTarget::VarMethod => "var-method",
            DashboardTarget::RunButton => "run-simulation-btn",
            DashboardTarget::PortfolioSelect => "portfolio-select",
            DashboardTarget::ScenariosContainer => "scenarios-container",
            DashboardTarget::AllocationChart => "allocation-chart",
            DashboardTarget::RiskChart => "risk-chart",
            DashboardTarget::StressTestChart => "stress-test-chart",
            DashboardTarget::SimulationResults => "simulation-results",
            DashboardTarget::RecentSimulations => "recent-simulations",
            DashboardTarget::ReportModal => "report-modal",
            DashboardTarget::Loading => "loading",
        }
    }

    fn required(self) -> bool {
        matches!(self, DashboardTarget::SimulationForm)
    }
}

/// State owned by the dashboard between interactions
#[derive(Debug, Clone, Default)]
pub struct DashboardModel {
    pub portfolios: Vec<Portfolio>,
    pub scenarios: Vec<Scenario>,
    pub current_simulation: Option<SimulationResult>,
    pub recent_simulations: Vec<SimulationSummary>,
    pub charts: DashboardCharts,
    pub view: ViewState,
}

/// User interaction dispatched to the dashboard
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// Click on a `nav a[href]` link
    NavClick { href: String },
    /// Click on a `[data-tab]` button
    TabClick { tab: String },
    SubmitSimulation,
    ViewReport(EntityId),
    DownloadReport(EntityId),
    CloseReport,
}

impl DashboardEvent {
    /// Event raised by a click on `key`, if the element is interactive
    pub fn from_click(doc: &Document, key: NodeKey) -> Option<Self> {
        let element = doc.get(key);
        if let Some(tab) = element.data("tab") {
            return Some(Self::TabClick { tab: tab.to_string() });
        }
        let simulation_id = element.data("simulation-id").map(EntityId::from);
        match (element.data("action"), simulation_id) {
            (Some("view"), Some(id)) => return Some(Self::ViewReport(id)),
            (Some("download"), Some(id)) => return Some(Self::DownloadReport(id)),
            (Some("close-report"), _) => return Some(Self::CloseReport),
            _ => {}
        }
        if element.tag() == "a" {
            let in_nav = Selector::tag("a").inside(Selector::tag("nav")).matches(doc, key);
            if let (true, Some(href)) = (in_nav, element.attr("href")) {
                return Some(Self::NavClick { href: href.to_string() });
            }
        }
        None
    }
}

/// Dashboard error types
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    UnknownSimulationType(#[from] UnknownSimulationType),

    #[error("Failed to save download: {0}")]
    Io(#[from] io::Error),
}

/// Controller of the risk simulation dashboard.
///
/// Owns the document, the view model and the API client. Failures of user
/// actions are logged and reported once through the notifier.
pub struct Dashboard<N: Notifier, S: DownloadSink> {
    client: ApiClient,
    document: Document,
    bindings: Bindings<DashboardTarget>,
    model: DashboardModel,
    notifier: N,
    sink: S,
}

impl<N: Notifier, S: DownloadSink> Dashboard<N, S> {
    /// Bind the document; no request is made until [`Dashboard::init`]
    pub fn new(
        client: ApiClient,
        document: Document,
        notifier: N,
        sink: S,
    ) -> Result<Self, BindingError> {
        let bindings = Bindings::bind(&document)?;
        Ok(Self {
            client,
            document,
            bindings,
            model: DashboardModel::default(),
            notifier,
            sink,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn model(&self) -> &DashboardModel {
        &self.model
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn target(&self, target: DashboardTarget) -> Option<NodeKey> {
        self.bindings.get(target)
    }

    fn field_value(&self, target: DashboardTarget) -> &str {
        self.target(target)
            .map(|key| self.document.value(key))
            .unwrap_or_default()
    }

    /// Load reference data, set up charts and show the overview
    pub async fn init(&mut self) {
        tracing::info!(base_url = %self.client.base_url(), "Initialising simulation dashboard");
        if let Err(err) = self.load_initial_data().await {
            tracing::error!(error = %err, "Failed to load initial data");
            self.notifier.notify_error(messages::LOAD_ERROR);
        }
        self.setup_charts();
        self.load_recent_simulations().await;
        self.show_section(Section::Overview);
        self.switch_tab(ResultsTab::Summary);
    }

    async fn load_initial_data(&mut self) -> Result<(), ApiError> {
        self.model.portfolios = self.client.list_portfolios().await?;
        self.model.scenarios = self.client.list_scenarios().await?;
        tracing::debug!(
            portfolios = self.model.portfolios.len(),
            scenarios = self.model.scenarios.len(),
            "Loaded reference data"
        );
        self.populate_portfolio_select();
        self.populate_scenario_select();
        Ok(())
    }

    pub fn populate_portfolio_select(&mut self) {
        let Some(select) = self.target(DashboardTarget::PortfolioSelect) else {
            return;
        };
        self.document
            .replace_children(select, portfolio_options(&self.model.portfolios));
        let first = self
            .model
            .portfolios
            .first()
            .map(|p| p.id.to_string())
            .unwrap_or_default();
        self.document.set_value(select, first);
    }

    pub fn populate_scenario_select(&mut self) {
        let Some(container) = self.target(DashboardTarget::ScenariosContainer) else {
            return;
        };
        self.document
            .replace_children(container, scenario_checkboxes(&self.model.scenarios));
    }

    /// Create the three charts for the canvases present in the document
    pub fn setup_charts(&mut self) {
        let chart_for = |target, make: fn() -> ChartJsConfig| {
            self.bindings.is_bound(target).then(make)
        };
        self.model.charts = DashboardCharts {
            allocation: chart_for(DashboardTarget::AllocationChart, allocation_chart),
            risk: chart_for(DashboardTarget::RiskChart, risk_chart),
            stress_test: chart_for(DashboardTarget::StressTestChart, stress_test_chart),
        };
        self.render_charts();
    }

    fn render_charts(&mut self) {
        let charts = [
            (DashboardTarget::AllocationChart, &self.model.charts.allocation),
            (DashboardTarget::RiskChart, &self.model.charts.risk),
            (DashboardTarget::StressTestChart, &self.model.charts.stress_test),
        ];
        for (target, chart) in charts {
            let (Some(canvas), Some(chart)) = (self.bindings.get(target), chart) else {
                continue;
            };
            match chart.to_json() {
                Ok(json) => self.document.get_mut(canvas).set_attr(CHART_ATTRIBUTE, json),
                Err(err) => tracing::warn!(chart = ?target, error = %err, "Failed to serialise chart"),
            }
        }
    }

    /// `GET /simulations/recent` into `#recent-simulations`; failures are
    /// only logged
    pub async fn load_recent_simulations(&mut self) {
        match self.client.recent_simulations().await {
            Ok(simulations) => {
                self.model.recent_simulations = simulations;
                if let Some(list) = self.target(DashboardTarget::RecentSimulations) {
                    self.document
                        .replace_children(list, recent_simulation_rows(&self.model.recent_simulations));
                }
            }
            Err(err) => tracing::warn!(error = %err, "Failed to load recent simulations"),
        }
    }

    pub fn show_section(&mut self, section: Section) {
        self.model.view = self.model.view.transition(ViewEvent::Navigate(section));
        view_state::show_section(&mut self.document, section);
    }

    pub fn switch_tab(&mut self, tab: ResultsTab) {
        self.model.view = self.model.view.transition(ViewEvent::SelectTab(tab));
        view_state::switch_tab(&mut self.document, tab);
    }

    /// Dispatch a user interaction
    pub async fn handle_event(&mut self, event: DashboardEvent) -> Result<(), DashboardError> {
        tracing::debug!(?event, "Dashboard event");
        match event {
            DashboardEvent::NavClick { href } => match Section::from_href(&href) {
                Ok(section) => self.show_section(section),
                Err(err) => tracing::warn!(error = %err, "Ignoring navigation click"),
            },
            DashboardEvent::TabClick { tab } => match tab.parse::<ResultsTab>() {
                Ok(tab) => self.switch_tab(tab),
                Err(err) => tracing::warn!(error = %err, "Ignoring tab click"),
            },
            DashboardEvent::SubmitSimulation => {
                self.run_simulation().await?;
            }
            DashboardEvent::ViewReport(id) => self.view_simulation(&id).await?,
            DashboardEvent::DownloadReport(id) => {
                self.download_simulation(&id).await?;
            }
            DashboardEvent::CloseReport => self.close_report(),
        }
        Ok(())
    }

    /// Portfolio chosen in `#portfolio-select`, else the first one
    pub fn selected_portfolio(&self) -> Option<Portfolio> {
        let value = self.field_value(DashboardTarget::PortfolioSelect);
        self.model
            .portfolios
            .iter()
            .find(|p| p.id.matches(value))
            .or_else(|| self.model.portfolios.first())
            .cloned()
    }

    /// Scenarios whose checkbox is checked; unknown ids are dropped
    pub fn selected_scenarios(&self) -> Vec<Scenario> {
        let checked = Selector::tag("input")
            .and(Selector::name("scenarios"))
            .and(Selector::Checked);
        self.document
            .query_all(&checked)
            .into_iter()
            .filter_map(|key| {
                let value = self.document.value(key);
                self.model.scenarios.iter().find(|s| s.id.matches(value))
            })
            .cloned()
            .collect()
    }

    /// Type-specific parameters read from the simulation form
    pub fn simulation_parameters(&self, simulation_type: SimulationType) -> SimulationParameters {
        match simulation_type {
            SimulationType::MarketRisk => SimulationParameters::MarketRisk(MarketRiskParameters {
                confidence_level: parse_float(self.field_value(DashboardTarget::ConfidenceLevel)),
                time_horizon: parse_int(self.field_value(DashboardTarget::TimeHorizon)),
                method: self.field_value(DashboardTarget::VarMethod).to_string(),
            }),
            _ => SimulationParameters::Empty {},
        }
    }

    /// Request built from the current state of the simulation form
    pub fn build_request(&self) -> Result<SimulationRequest, UnknownSimulationType> {
        let simulation_type: SimulationType =
            self.field_value(DashboardTarget::SimulationType).parse()?;
        Ok(SimulationRequest {
            simulation_type,
            portfolio: self.selected_portfolio(),
            parameters: self.simulation_parameters(simulation_type),
            scenarios: self.selected_scenarios(),
        })
    }

    fn set_loading(&mut self, loading: bool) {
        if let Some(indicator) = self.target(DashboardTarget::Loading) {
            if loading {
                self.document.show(indicator);
            } else {
                self.document.hide(indicator);
            }
        }
        if let Some(button) = self.target(DashboardTarget::RunButton) {
            self.document.set_disabled(button, loading);
        }
    }

    /// Submit the simulation form and display the result.
    ///
    /// The loading indicator is hidden and the run button re-enabled
    /// whatever the outcome.
    pub async fn run_simulation(&mut self) -> Result<&SimulationResult, DashboardError> {
        let request = match self.build_request() {
            Ok(request) => request,
            Err(err) => {
                tracing::error!(error = %err, "Invalid simulation form");
                self.notifier.notify_error(messages::SIMULATION_ERROR);
                return Err(err.into());
            }
        };
        tracing::info!(
            simulation_type = %request.simulation_type,
            scenarios = request.scenarios.len(),
            "Running simulation"
        );

        self.set_loading(true);
        let outcome = self.client.run_simulation(&request).await;
        self.set_loading(false);

        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(error = %err, "Simulation error");
                self.notifier.notify_error(messages::SIMULATION_ERROR);
                return Err(err.into());
            }
        };

        self.show_section(Section::Results);
        self.update_results_display(&result);
        self.update_charts_with_results(&result);
        self.load_recent_simulations().await;
        Ok(&*self.model.current_simulation.insert(result))
    }

    /// Render the results panel into `#simulation-results`
    pub fn update_results_display(&mut self, result: &SimulationResult) {
        if let Some(panel) = self.target(DashboardTarget::SimulationResults) {
            self.document.set_inner_html(panel, render_results_panel(result));
        }
    }

    pub fn update_charts_with_results(&mut self, result: &SimulationResult) {
        self.model.charts.update_with_results(result);
        self.render_charts();
    }

    /// `GET /reports/{id}` into the report modal
    pub async fn view_simulation(&mut self, id: &EntityId) -> Result<(), DashboardError> {
        let report = match self.client.fetch_report(id).await {
            Ok(report) => report,
            Err(err) => {
                tracing::error!(error = %err, simulation_id = %id, "Error viewing simulation");
                self.notifier.notify_error(messages::REPORT_ERROR);
                return Err(err.into());
            }
        };
        if let Some(modal) = self.target(DashboardTarget::ReportModal) {
            self.document.replace_children(modal, [render_report_modal(&report)]);
            self.document.show(modal);
        }
        Ok(())
    }

    pub fn close_report(&mut self) {
        if let Some(modal) = self.target(DashboardTarget::ReportModal) {
            self.document.hide(modal);
        }
    }

    /// `GET /download/{id}` saved as `simulation_{id}_report.json`
    pub async fn download_simulation(&mut self, id: &EntityId) -> Result<PathBuf, DashboardError> {
        let file_name = format!("simulation_{}_report.json", id);
        let saved = match self.client.download_report(id).await {
            Ok(bytes) => self.sink.save(&file_name, &bytes).map_err(DashboardError::from),
            Err(err) => Err(err.into()),
        };
        if let Err(err) = &saved {
            tracing::error!(error = %err, simulation_id = %id, "Error downloading simulation");
            self.notifier.notify_error(messages::DOWNLOAD_ERROR);
        }
        saved
    }

    /// `[data-tab]` buttons currently marked active
    pub fn active_tab_buttons(&self) -> Vec<NodeKey> {
        self.document
            .query_all(&Selector::has_data("tab").and(Selector::class(ACTIVE_CLASS)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{MemorySink, RecordingNotifier};
    use crate::template::dashboard_document;
    use view_dom::Node;

    fn dashboard() -> Dashboard<RecordingNotifier, MemorySink> {
        Dashboard::new(
            ApiClient::new("http://127.0.0.1:9"),
            dashboard_document(),
            RecordingNotifier::new(),
            MemorySink::default(),
        )
        .unwrap()
    }

    fn portfolio(id: i64, name: &str) -> Portfolio {
        Portfolio {
            id: EntityId::Number(id),
            name: name.to_string(),
            total_value: 1000.0 * id as f64,
        }
    }

    #[test]
    fn test_missing_form_fails_binding() {
        let result = Dashboard::new(
            ApiClient::new("http://127.0.0.1:9"),
            Document::new(),
            RecordingNotifier::new(),
            MemorySink::default(),
        );
        assert!(matches!(
            result,
            Err(BindingError::MissingTarget { element_id: "simulation-form", .. })
        ));
    }

    #[test]
    fn test_selected_portfolio_falls_back_to_first() {
        let mut dashboard = dashboard();
        dashboard.model.portfolios = vec![portfolio(1, "A"), portfolio(2, "B")];
        dashboard.populate_portfolio_select();
        assert_eq!(dashboard.selected_portfolio().unwrap().name, "A");

        let select = dashboard.target(DashboardTarget::PortfolioSelect).unwrap();
        dashboard.document.set_value(select, "2");
        assert_eq!(dashboard.selected_portfolio().unwrap().name, "B");

        dashboard.document.set_value(select, "99");
        assert_eq!(dashboard.selected_portfolio().unwrap().name, "A");

        dashboard.model.portfolios.clear();
        assert!(dashboard.selected_portfolio().is_none());
    }

    #[test]
    fn test_selected_scenarios_drop_unknown_ids() {
        let mut dashboard = dashboard();
        dashboard.model.scenarios = vec![Scenario {
            id: EntityId::Number(1),
            name: "Crise".to_string(),
            description: String::new(),
            is_default: true,
        }];
        dashboard.populate_scenario_select();
        let container = dashboard.target(DashboardTarget::ScenariosContainer).unwrap();
        dashboard.document.append(
            container,
            Node::new("input")
                .attr("type", "checkbox")
                .name("scenarios")
                .value("42")
                .checked(true),
        );

        let selected = dashboard.selected_scenarios();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "Crise");
    }

    #[test]
    fn test_market_risk_parameters_from_form() {
        let mut dashboard = dashboard();
        let confidence = dashboard.target(DashboardTarget::ConfidenceLevel).unwrap();
        dashboard.document.set_value(confidence, "0.99");
        let horizon = dashboard.target(DashboardTarget::TimeHorizon).unwrap();
        dashboard.document.set_value(horizon, "abc");

        match dashboard.simulation_parameters(SimulationType::MarketRisk) {
            SimulationParameters::MarketRisk(params) => {
                assert_eq!(params.confidence_level, Some(0.99));
                assert_eq!(params.time_horizon, None);
                assert_eq!(params.method, "historical");
            }
            other => panic!("unexpected parameters: {:?}", other),
        }
        assert_eq!(
            dashboard.simulation_parameters(SimulationType::CreditRisk),
            SimulationParameters::Empty {}
        );
    }

    #[test]
    fn test_build_request_rejects_unknown_type() {
        let mut dashboard = dashboard();
        let select = dashboard.target(DashboardTarget::SimulationType).unwrap();
        dashboard.document.set_value(select, "monte-carlo");
        assert!(dashboard.build_request().is_err());
    }

    #[test]
    fn test_setup_charts_writes_canvas_config() {
        let mut dashboard = dashboard();
        dashboard.setup_charts();
        assert!(dashboard.model().charts.allocation.is_some());

        let canvas = dashboard.target(DashboardTarget::RiskChart).unwrap();
        let json = dashboard.document().get(canvas).attr(CHART_ATTRIBUTE).unwrap();
        assert!(json.contains("Métriques de Risque"));
    }

    #[test]
    fn test_event_from_click() {
        let mut doc = dashboard_document();
        let root = doc.root();
        let view = doc.append(
            root,
            Node::new("button")
                .data("action", "view")
                .data("simulation-id", "12"),
        );
        assert_eq!(
            DashboardEvent::from_click(&doc, view),
            Some(DashboardEvent::ViewReport(EntityId::Number(12)))
        );

        let tab = doc.query(&Selector::data_eq("tab", "risk")).unwrap();
        assert_eq!(
            DashboardEvent::from_click(&doc, tab),
            Some(DashboardEvent::TabClick { tab: "risk".to_string() })
        );

        let link = doc
            .query(&Selector::tag("a").and(Selector::attr_eq("href", "#history")))
            .unwrap();
        assert_eq!(
            DashboardEvent::from_click(&doc, link),
            Some(DashboardEvent::NavClick { href: "#history".to_string() })
        );

        assert_eq!(DashboardEvent::from_click(&doc, root), None);
    }

    #[tokio::test]
    async fn test_nav_event_switches_section() {
        let mut dashboard = dashboard();
        dashboard
            .handle_event(DashboardEvent::NavClick { href: "#history".to_string() })
            .await
            .unwrap();
        assert_eq!(dashboard.model().view.section, Section::History);

        dashboard
            .handle_event(DashboardEvent::NavClick { href: "#nowhere".to_string() })
            .await
            .unwrap();
        assert_eq!(dashboard.model().view.section, Section::History);

        dashboard
            .handle_event(DashboardEvent::TabClick { tab: "allocation".to_string() })
            .await
            .unwrap();
        assert_eq!(dashboard.active_tab_buttons().len(), 1);
    }
}
