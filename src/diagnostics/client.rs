use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::types::{DiagnosticRequest, DiagnosticResult, ServiceErrorBody};
use crate::config::{RequestConfig, ServiceConfig};
use crate::error::{ServiceError, ServiceResult};

/// Remote collaborator that runs diagnostics and AI analysis for a target.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiagnosticsService {
    /// Submit one diagnostic request and wait for the full result.
    async fn diagnose(&self, request: &DiagnosticRequest) -> ServiceResult<DiagnosticResult>;
}

/// HTTP client for the diagnostics service
#[derive(Clone)]
pub struct DiagnosticsClient {
    client: Client,
    base_url: String,
    request_config: RequestConfig,
}

impl DiagnosticsClient {
    /// Create a new diagnostics client
    pub fn new(config: &ServiceConfig, request_config: RequestConfig) -> ServiceResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout_ms) = request_config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder.build().map_err(ServiceError::Transport)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_config,
        })
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the diagnose endpoint
    pub fn diagnose_url(&self) -> String {
        format!("{}/diagnose", self.base_url)
    }

    /// Execute a single request (internal)
    async fn execute_request(&self, request: &DiagnosticRequest) -> ServiceResult<DiagnosticResult> {
        let url = self.diagnose_url();

        debug!(
            target_host = %request.target,
            enterprise = request.has_enterprise_context(),
            "Posting diagnostic request"
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| match self.request_config.timeout_ms {
                Some(timeout_ms) if e.is_timeout() => ServiceError::Timeout { timeout_ms },
                _ => ServiceError::Transport(e),
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ServiceErrorBody>(&error_body)
                .ok()
                .and_then(|body| body.message());
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let result: DiagnosticResult =
            response
                .json()
                .await
                .map_err(|e| ServiceError::InvalidResponse {
                    message: format!("Failed to parse diagnostic result: {}", e),
                })?;

        Ok(result)
    }
}

#[async_trait]
impl DiagnosticsService for DiagnosticsClient {
    async fn diagnose(&self, request: &DiagnosticRequest) -> ServiceResult<DiagnosticResult> {
        let start = Instant::now();

        match self.execute_request(request).await {
            Ok(result) => {
                info!(
                    target_host = %request.target,
                    tests = result.diagnostics.len(),
                    latency_ms = start.elapsed().as_millis(),
                    "Diagnostic request succeeded"
                );
                Ok(result)
            }
            Err(e) => {
                error!(
                    target_host = %request.target,
                    error = %e,
                    latency_ms = start.elapsed().as_millis(),
                    "Diagnostic request failed"
                );
                Err(e)
            }
        }
    }
}
