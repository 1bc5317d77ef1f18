//! API client for the risk simulation backend.

use infra_config::FrontConfig;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::models::{EntityId, Portfolio, Scenario, SimulationRequest, SimulationResult, SimulationSummary};

/// API client error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status
    #[error("API error: {status} on {path}")]
    Status { status: StatusCode, path: String },

    /// Connection, timeout or body decoding failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// API client for the simulation backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a new API client without request timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client honouring the configured base URL and timeout
    pub fn from_config(config: &FrontConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn check(response: Response, path: &str) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status {
                status,
                path: path.to_string(),
            })
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!(path, "GET");
        let response = self.client.get(self.url(path)).send().await?;
        Ok(Self::check(response, path)?.json().await?)
    }

    /// `GET /portfolios`
    pub async fn list_portfolios(&self) -> Result<Vec<Portfolio>, ApiError> {
        self.get_json("/portfolios").await
    }

    /// `GET /scenarios`
    pub async fn list_scenarios(&self) -> Result<Vec<Scenario>, ApiError> {
        self.get_json("/scenarios").await
    }

    /// `GET /simulations/recent`
    pub async fn recent_simulations(&self) -> Result<Vec<SimulationSummary>, ApiError> {
        self.get_json("/simulations/recent").await
    }

    /// `POST /simulations/{type}`
    pub async fn run_simulation(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResult, ApiError> {
        let path = format!("/simulations/{}", request.simulation_type);
        tracing::debug!(path = %path, "POST");
        let response = self.client.post(self.url(&path)).json(request).send().await?;
        Ok(Self::check(response, &path)?.json().await?)
    }

    /// `GET /reports/{id}`
    pub async fn fetch_report(&self, id: &EntityId) -> Result<Value, ApiError> {
        self.get_json(&format!("/reports/{}", id)).await
    }

    /// `GET /download/{id}`, returning the raw body
    pub async fn download_report(&self, id: &EntityId) -> Result<Vec<u8>, ApiError> {
        let path = format!("/download/{}", id);
        tracing::debug!(path = %path, "GET");
        let response = self.client.get(self.url(&path)).send().await?;
        let bytes = Self::check(response, &path)?.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Health check
    pub async fn health(&self) -> bool {
        match self.client.get(self.url("/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::debug!(error = %err, "Health check failed");
                false
            }
        }
    }
}
