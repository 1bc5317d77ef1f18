//! Mock simulation backend shared by the dashboard integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Id of the only simulation the mock knows about
pub const KNOWN_SIMULATION: i64 = 42;

/// Simulation listed with a textual id that only looks numeric
pub const PADDED_SIMULATION: &str = "007";

/// Body served by `GET /download/42`
pub const REPORT_BYTES: &[u8] = br#"{"id":42,"status":"completed"}"#;

/// Body served by `GET /download/007`
pub const PADDED_REPORT_BYTES: &[u8] = br#"{"id":"007","status":"completed"}"#;

#[derive(Default)]
pub struct MockState {
    /// Status returned by `POST /simulations/{type}`; success when `None`
    pub simulation_failure: Option<StatusCode>,
    /// Never answer `POST /simulations/{type}`
    pub stall_simulation: bool,
    /// Bodies received by `POST /simulations/{type}`, with the path type
    pub simulation_requests: Mutex<Vec<(String, Value)>>,
}

pub fn simulation_result() -> Value {
    json!({
        "id": KNOWN_SIMULATION,
        "type": "market-risk",
        "results": {
            "portfolio_value": 100000.0,
            "max_loss": 25000.0,
            "most_severe_scenario": "Krach boursier",
            "var_95": 12000.0,
            "expected_shortfall": 15000.0,
            "scr": 18000.0,
            "allocation": [
                {"label": "Actions", "value": 60.0},
                {"label": "Obligations", "value": 40.0}
            ],
            "stress_tests": [
                {"scenario": "Krach boursier", "loss": 25000.0},
                {"scenario": "Hausse des taux", "loss": 8000.0}
            ]
        }
    })
}

async fn portfolios() -> Json<Value> {
    Json(json!([
        {"id": 1, "name": "Portefeuille Équilibré", "total_value": 100000.0},
        {"id": 2, "name": "Portefeuille Dynamique", "total_value": 250000.0}
    ]))
}

async fn scenarios() -> Json<Value> {
    Json(json!([
        {"id": 1, "name": "Krach boursier", "description": "-30% sur les actions", "is_default": true},
        {"id": "rates-up", "name": "Hausse des taux", "description": "+200bp", "is_default": false}
    ]))
}

async fn recent() -> Json<Value> {
    Json(json!([
        {
            "id": KNOWN_SIMULATION,
            "type": "market-risk",
            "portfolio_name": "Portefeuille Équilibré",
            "created_at": "2024-03-05T14:07:00Z",
            "status": "completed"
        },
        {
            "id": PADDED_SIMULATION,
            "type": "stress-test",
            "portfolio_name": "Portefeuille Dynamique",
            "created_at": "2024-03-04T09:30:00.125000"
        }
    ]))
}

async fn run_simulation(
    State(state): State<Arc<MockState>>,
    Path(kind): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Ok(mut requests) = state.simulation_requests.lock() {
        requests.push((kind, body));
    }
    if state.stall_simulation {
        std::future::pending::<()>().await;
    }
    match state.simulation_failure {
        Some(status) => (status, "simulation failed").into_response(),
        None => Json(simulation_result()).into_response(),
    }
}

async fn report(Path(id): Path<String>) -> Response {
    if id == KNOWN_SIMULATION.to_string() {
        Json(json!({"id": KNOWN_SIMULATION, "summary": "VaR 95% <12 000 €>"})).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn download(Path(id): Path<String>) -> Response {
    if id == KNOWN_SIMULATION.to_string() {
        REPORT_BYTES.to_vec().into_response()
    } else if id == PADDED_SIMULATION {
        PADDED_REPORT_BYTES.to_vec().into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

pub fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/portfolios", get(portfolios))
        .route("/api/scenarios", get(scenarios))
        .route("/api/simulations/recent", get(recent))
        .route("/api/simulations/:kind", post(run_simulation))
        .route("/api/reports/:id", get(report))
        .route("/api/download/:id", get(download))
        .with_state(state)
}

/// Serve the mock on an ephemeral port, returning the API base URL
pub async fn spawn_mock_backend(state: Arc<MockState>) -> (String, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    let app = router(state);
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (format!("http://{}/api", addr), handle)
}
