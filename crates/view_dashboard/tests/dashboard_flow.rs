//! Dashboard integration tests against a mock simulation backend.

mod common;

use std::sync::Arc;
use std::time::Duration;

use approx::assert_relative_eq;
use axum::http::StatusCode;
use common::{
    spawn_mock_backend, MockState, KNOWN_SIMULATION, PADDED_REPORT_BYTES, PADDED_SIMULATION,
    REPORT_BYTES,
};
use view_dashboard::{
    dashboard_document, messages, ApiClient, Dashboard, DashboardEvent, DirectorySink, EntityId,
    MemorySink, RecordingNotifier, ResultsTab, Section,
};
use view_dom::{Document, Selector};

type TestDashboard = Dashboard<RecordingNotifier, MemorySink>;

async fn dashboard_with(state: MockState) -> (TestDashboard, Arc<MockState>, tokio::task::JoinHandle<()>) {
    let state = Arc::new(state);
    let (base_url, handle) = spawn_mock_backend(state.clone()).await;
    let mut dashboard = Dashboard::new(
        ApiClient::new(base_url),
        dashboard_document(),
        RecordingNotifier::new(),
        MemorySink::default(),
    )
    .unwrap();
    dashboard.init().await;
    (dashboard, state, handle)
}

fn is_visible(doc: &Document, id: &str) -> bool {
    let key = doc.get_by_id(id).unwrap();
    !doc.is_hidden(key)
}

fn inner_html(doc: &Document, id: &str) -> String {
    doc.inner_html(doc.get_by_id(id).unwrap())
}

#[tokio::test]
async fn test_init_populates_form_and_shows_overview() {
    let (dashboard, _, handle) = dashboard_with(MockState::default()).await;
    let doc = dashboard.document();

    assert!(dashboard.notifier().messages.is_empty());
    assert_eq!(dashboard.model().portfolios.len(), 2);
    assert!(is_visible(doc, "overview"));
    assert!(!is_visible(doc, "results"));
    assert!(is_visible(doc, "summary-tab"));
    assert!(!is_visible(doc, "risk-tab"));

    let options = doc.query_all(&Selector::tag("option").inside(Selector::id("portfolio-select")));
    assert_eq!(options.len(), 2);
    assert_eq!(dashboard.selected_portfolio().unwrap().id, EntityId::Number(1));

    let selected: Vec<String> = dashboard.selected_scenarios().into_iter().map(|s| s.name).collect();
    assert_eq!(selected, vec!["Krach boursier"]);

    assert!(inner_html(doc, "recent-simulations").contains("Portefeuille Équilibré"));

    handle.abort();
}

#[tokio::test]
async fn test_init_with_unreachable_backend_notifies_once() {
    let mut dashboard = Dashboard::new(
        ApiClient::new("http://127.0.0.1:1/api"),
        dashboard_document(),
        RecordingNotifier::new(),
        MemorySink::default(),
    )
    .unwrap();
    dashboard.init().await;

    assert_eq!(dashboard.notifier().messages, vec![messages::LOAD_ERROR]);
    assert!(dashboard.model().portfolios.is_empty());
    assert!(is_visible(dashboard.document(), "overview"));
}

#[tokio::test]
async fn test_successful_simulation_renders_results() {
    let (mut dashboard, state, handle) = dashboard_with(MockState::default()).await;

    let result = dashboard.run_simulation().await.unwrap();
    assert_eq!(result.id, Some(EntityId::Number(KNOWN_SIMULATION)));

    let doc = dashboard.document();
    assert!(is_visible(doc, "results"));
    assert!(!is_visible(doc, "simulation"));
    assert!(!is_visible(doc, "loading"));
    assert!(!doc.get(doc.get_by_id("run-simulation-btn").unwrap()).is_disabled());

    let panel = inner_html(doc, "simulation-results");
    assert!(panel.contains(r#"<p class="text-2xl text-red-600">25.00%</p>"#));
    assert!(panel.contains("100\u{202F}000,00\u{00A0}€"));
    assert!(panel.contains("Krach boursier"));

    let risk = dashboard.model().charts.risk.as_ref().unwrap();
    assert_relative_eq!(risk.values()[0], 12_000.0);
    assert_relative_eq!(risk.values()[3], 18_000.0);
    let canvas = doc.get_by_id("allocation-chart").unwrap();
    assert!(doc.get(canvas).attr("data-chart").unwrap().contains("Obligations"));

    assert!(dashboard.model().current_simulation.is_some());
    assert!(dashboard.notifier().messages.is_empty());

    let requests = state.simulation_requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (kind, body) = &requests[0];
    assert_eq!(kind, "market-risk");
    assert_eq!(body["type"], "market-risk");
    assert_eq!(body["portfolio"]["id"], 1);
    assert_eq!(body["parameters"]["confidence_level"], 0.95);
    assert_eq!(body["parameters"]["time_horizon"], 10);
    assert_eq!(body["parameters"]["method"], "historical");
    assert_eq!(body["scenarios"].as_array().unwrap().len(), 1);

    handle.abort();
}

#[tokio::test]
async fn test_pending_simulation_shows_loading_state() {
    let state = MockState {
        stall_simulation: true,
        ..Default::default()
    };
    let (mut dashboard, state, handle) = dashboard_with(state).await;
    {
        let doc = dashboard.document();
        assert!(!is_visible(doc, "loading"));
        assert!(!doc.get(doc.get_by_id("run-simulation-btn").unwrap()).is_disabled());
    }

    let pending = tokio::time::timeout(Duration::from_millis(300), dashboard.run_simulation()).await;
    assert!(pending.is_err());
    assert_eq!(state.simulation_requests.lock().unwrap().len(), 1);

    let doc = dashboard.document();
    assert!(is_visible(doc, "loading"));
    assert!(doc.get(doc.get_by_id("run-simulation-btn").unwrap()).is_disabled());
    assert!(dashboard.model().current_simulation.is_none());

    handle.abort();
}

#[tokio::test]
async fn test_failed_simulation_hides_loading_and_notifies_once() {
    let state = MockState {
        simulation_failure: Some(StatusCode::INTERNAL_SERVER_ERROR),
        ..Default::default()
    };
    let (mut dashboard, _, handle) = dashboard_with(state).await;

    assert!(dashboard.run_simulation().await.is_err());

    let doc = dashboard.document();
    assert!(!is_visible(doc, "loading"));
    assert!(!doc.get(doc.get_by_id("run-simulation-btn").unwrap()).is_disabled());
    assert_eq!(dashboard.notifier().messages, vec![messages::SIMULATION_ERROR]);
    assert!(dashboard.model().current_simulation.is_none());
    assert!(is_visible(doc, "overview"));

    handle.abort();
}

#[tokio::test]
async fn test_credit_risk_sends_empty_parameters() {
    let (mut dashboard, state, handle) = dashboard_with(MockState::default()).await;
    let select = dashboard.document().get_by_id("simulation-type").unwrap();
    dashboard.document_mut().set_value(select, "credit-risk");

    dashboard
        .handle_event(DashboardEvent::SubmitSimulation)
        .await
        .unwrap();

    let requests = state.simulation_requests.lock().unwrap();
    assert_eq!(requests[0].0, "credit-risk");
    assert_eq!(requests[0].1["parameters"], serde_json::json!({}));

    handle.abort();
}

#[tokio::test]
async fn test_view_and_close_report() {
    let (mut dashboard, _, handle) = dashboard_with(MockState::default()).await;

    dashboard
        .view_simulation(&EntityId::Number(KNOWN_SIMULATION))
        .await
        .unwrap();
    assert!(is_visible(dashboard.document(), "report-modal"));
    let modal = inner_html(dashboard.document(), "report-modal");
    assert!(modal.contains("&lt;12 000 €&gt;"));

    let close = dashboard
        .document()
        .query(&Selector::data_eq("action", "close-report").inside(Selector::id("report-modal")))
        .unwrap();
    let event = DashboardEvent::from_click(dashboard.document(), close).unwrap();
    assert_eq!(event, DashboardEvent::CloseReport);
    dashboard.handle_event(event).await.unwrap();
    assert!(!is_visible(dashboard.document(), "report-modal"));

    assert!(dashboard.view_simulation(&EntityId::Number(7)).await.is_err());
    assert_eq!(dashboard.notifier().messages, vec![messages::REPORT_ERROR]);
    assert!(!is_visible(dashboard.document(), "report-modal"));

    handle.abort();
}

#[tokio::test]
async fn test_download_saves_report_file() {
    let state = Arc::new(MockState::default());
    let (base_url, handle) = spawn_mock_backend(state).await;
    let dir = tempfile::tempdir().unwrap();
    let mut dashboard = Dashboard::new(
        ApiClient::new(base_url),
        dashboard_document(),
        RecordingNotifier::new(),
        DirectorySink::new(dir.path()),
    )
    .unwrap();

    let path = dashboard
        .download_simulation(&EntityId::Number(KNOWN_SIMULATION))
        .await
        .unwrap();
    assert_eq!(path, dir.path().join("simulation_42_report.json"));
    assert_eq!(std::fs::read(&path).unwrap(), REPORT_BYTES);

    assert!(dashboard.download_simulation(&EntityId::Number(7)).await.is_err());
    assert!(!dir.path().join("simulation_7_report.json").exists());
    assert_eq!(dashboard.notifier().messages, vec![messages::DOWNLOAD_ERROR]);

    handle.abort();
}

#[tokio::test]
async fn test_recent_list_actions_dispatch() {
    let (mut dashboard, _, handle) = dashboard_with(MockState::default()).await;

    let download = dashboard
        .document()
        .query(&Selector::data_eq("action", "download"))
        .unwrap();
    let event = DashboardEvent::from_click(dashboard.document(), download).unwrap();
    assert_eq!(event, DashboardEvent::DownloadReport(EntityId::Number(KNOWN_SIMULATION)));

    dashboard.handle_event(event).await.unwrap();
    let files = &dashboard.sink().files;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, "simulation_42_report.json");

    handle.abort();
}

#[tokio::test]
async fn test_padded_text_id_survives_recent_list_click() {
    let (mut dashboard, _, handle) = dashboard_with(MockState::default()).await;
    assert!(dashboard.notifier().messages.is_empty());
    assert_eq!(dashboard.model().recent_simulations.len(), 2);
    assert!(inner_html(dashboard.document(), "recent-simulations").contains("04/03/2024 09:30"));

    let download = dashboard
        .document()
        .query(
            &Selector::data_eq("action", "download")
                .and(Selector::data_eq("simulation-id", PADDED_SIMULATION)),
        )
        .unwrap();
    let event = DashboardEvent::from_click(dashboard.document(), download).unwrap();
    assert_eq!(
        event,
        DashboardEvent::DownloadReport(EntityId::Text(PADDED_SIMULATION.to_string()))
    );

    dashboard.handle_event(event).await.unwrap();
    let files = &dashboard.sink().files;
    assert_eq!(files[0].0, "simulation_007_report.json");
    assert_eq!(files[0].1, PADDED_REPORT_BYTES);

    handle.abort();
}

#[tokio::test]
async fn test_navigation_and_tabs() {
    let (mut dashboard, _, handle) = dashboard_with(MockState::default()).await;

    let link = dashboard
        .document()
        .query(&Selector::tag("a").and(Selector::attr_eq("href", "#history")))
        .unwrap();
    let event = DashboardEvent::from_click(dashboard.document(), link).unwrap();
    dashboard.handle_event(event).await.unwrap();
    dashboard.switch_tab(ResultsTab::StressTest);

    let doc = dashboard.document();
    assert_eq!(dashboard.model().view.section, Section::History);
    assert!(is_visible(doc, "history"));
    assert!(!is_visible(doc, "overview"));
    assert!(doc.has_class(link, "active"));
    assert!(is_visible(doc, "stress-test-tab"));
    assert!(!is_visible(doc, "summary-tab"));

    handle.abort();
}
