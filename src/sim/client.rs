use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::error::ApiError;
use super::result::SimulationResult;
use super::run_config::RunConfig;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct ReportRequest<'a> {
    results: &'a SimulationResult,
    config: &'a RunConfig,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Network {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    #[instrument(skip(self, password))]
    pub fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let url = self.endpoint("token");
        let response = self
            .client
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .map_err(|source| ApiError::Network {
                url: url.clone(),
                source,
            })?;

        let token: TokenResponse = decode(check_status(&url, response)?, &url)?;
        info!("signed in as {username}");
        Ok(token.access_token)
    }

    #[instrument(skip_all, fields(strategy = ?config.strategy, nodes = config.num_nodes, blocked = config.blocked_node_ids.len()))]
    pub fn simulate(&self, token: &str, config: &RunConfig) -> Result<SimulationResult, ApiError> {
        let url = self.endpoint("simulate");
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(config)
            .send()
            .map_err(|source| ApiError::Network {
                url: url.clone(),
                source,
            })?;

        let result: SimulationResult = decode(check_status(&url, response)?, &url)?;
        debug!(
            steps = result.step_count(),
            nodes = result.graph_topology.node_count(),
            "simulation result received"
        );
        Ok(result)
    }

    #[instrument(skip_all)]
    pub fn generate_report(
        &self,
        result: &SimulationResult,
        config: &RunConfig,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint("generate_pdf_report");
        let response = self
            .client
            .post(&url)
            .json(&ReportRequest {
                results: result,
                config,
            })
            .send()
            .map_err(|source| ApiError::Network {
                url: url.clone(),
                source,
            })?;

        let bytes = check_status(&url, response)?
            .bytes()
            .map_err(|source| ApiError::Decode {
                url: url.clone(),
                source,
            })?;
        debug!(size = bytes.len(), "report received");
        Ok(bytes.to_vec())
    }
}

fn check_status(url: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .unwrap_or_else(|_| format!("HTTP error: {status}"));
    Err(status_error(url, status, body))
}

fn status_error(url: &str, status: StatusCode, body: String) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Auth(body),
        _ => ApiError::Http {
            url: url.to_owned(),
            status,
            body,
        },
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: Response, url: &str) -> Result<T, ApiError> {
    response.json().map_err(|source| ApiError::Decode {
        url: url.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_without_doubled_slashes() {
        let client = ApiClient::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint("simulate"), "http://localhost:8000/simulate");
        assert_eq!(client.endpoint("/token"), "http://localhost:8000/token");
    }

    #[test]
    fn unauthorized_maps_to_auth_error() {
        let error = status_error(
            "http://x/token",
            StatusCode::UNAUTHORIZED,
            "Incorrect username or password".to_owned(),
        );
        assert!(error.is_auth());
    }

    #[test]
    fn server_errors_keep_status_and_body() {
        let error = status_error(
            "http://x/simulate",
            StatusCode::INTERNAL_SERVER_ERROR,
            "boom".to_owned(),
        );
        match error {
            ApiError::Http { status, body, .. } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn report_body_nests_result_and_config() {
        let result = SimulationResult::default();
        let config = RunConfig::default();
        let body = serde_json::to_value(ReportRequest {
            results: &result,
            config: &config,
        })
        .unwrap();
        assert!(body["results"].get("graph_topology").is_some());
        assert_eq!(body["config"]["num_nodes"], serde_json::json!(250));
    }
}
