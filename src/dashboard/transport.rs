use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::RequestConfig;
use crate::error::{ClientError, ClientResult};
use crate::flights::FlightRecord;
use crate::insights::InsightResult;

/// Path of the refresh endpoint relative to the server root.
pub const REFRESH_PATH: &str = "/api/refresh-insights";

/// Request body of the refresh endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub flight_data: Vec<FlightRecord>,
}

/// Successful response of the refresh endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub insights: InsightResult,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Carries a refresh request to the server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefreshTransport: Send + Sync {
    /// Ask the server for fresh insights over `records`.
    async fn refresh(&self, records: &[FlightRecord]) -> ClientResult<InsightResult>;
}

/// [`RefreshTransport`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRefreshTransport {
    client: Client,
    endpoint: String,
}

impl HttpRefreshTransport {
    /// Create a transport for the server at `base_url`
    pub fn new(base_url: &str, request_config: &RequestConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), REFRESH_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RefreshTransport for HttpRefreshTransport {
    async fn refresh(&self, records: &[FlightRecord]) -> ClientResult<InsightResult> {
        debug!(endpoint = %self.endpoint, records = records.len(), "Requesting insight refresh");

        let body = RefreshRequest {
            flight_data: records.to_vec(),
        };
        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or(text);
            warn!(status = status.as_u16(), error = %message, "Insight refresh rejected");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: RefreshResponse = response.json().await.map_err(|e| ClientError::Decode {
            message: e.to_string(),
        })?;

        Ok(parsed.insights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let transport =
            HttpRefreshTransport::new("http://localhost:5000/", &RequestConfig::default()).unwrap();
        assert_eq!(
            transport.endpoint(),
            "http://localhost:5000/api/refresh-insights"
        );
    }

    #[test]
    fn test_refresh_request_defaults_to_empty() {
        let req: RefreshRequest = serde_json::from_str("{}").unwrap();
        assert!(req.flight_data.is_empty());
    }
}
