use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::config::{OpenAiConfig, RequestConfig};
use crate::error::{OpenAiError, OpenAiResult};

/// Client for the OpenAI chat completions API
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    request_config: RequestConfig,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.request_config.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Create a new client; fails when no API key is configured
    pub fn new(config: &OpenAiConfig, request_config: RequestConfig) -> OpenAiResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(OpenAiError::MissingCredentials)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(OpenAiError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            request_config,
        })
    }

    /// Send one chat completion request. No retries are attempted.
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> OpenAiResult<ChatCompletionResponse> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let start = Instant::now();

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Calling OpenAI chat completions"
        );

        match self.execute_request(&url, request).await {
            Ok(response) => {
                info!(
                    model = %request.model,
                    latency_ms = start.elapsed().as_millis(),
                    "OpenAI chat completion succeeded"
                );
                Ok(response)
            }
            Err(e) => {
                error!(
                    model = %request.model,
                    error = %e,
                    latency_ms = start.elapsed().as_millis(),
                    "OpenAI chat completion failed"
                );
                Err(e)
            }
        }
    }

    async fn execute_request(
        &self,
        url: &str,
        request: &ChatCompletionRequest,
    ) -> OpenAiResult<ChatCompletionResponse> {
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OpenAiError::Timeout {
                        timeout_ms: self.request_config.timeout_ms,
                    }
                } else {
                    OpenAiError::Http(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(OpenAiError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| OpenAiError::InvalidResponse {
                message: format!("Failed to parse response: {}", e),
            })
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
