//! Remote job client over HTTP.

use crate::error::{ClientError, Result};
use exposure_core::config::ServiceConfig;
use exposure_core::types::{CollectPayload, ScanJob, ScanRequest};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum additional attempts for the idempotent simulation read.
const MAX_SIMULATION_RETRIES: u32 = 2;

/// Base delay in milliseconds for retry backoff.
const RETRY_DELAY_MS: u64 = 500;

/// Client for the remote scanning service.
///
/// Each operation is a single HTTP request-response exchange with JSON
/// bodies, bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct RemoteJobClient {
    http: Client,
    base_url: String,
}

impl RemoteJobClient {
    /// Create a client from validated service settings.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL the client was configured with.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST the consented fingerprint payload to `/collect`.
    ///
    /// The response body is not consumed, but failures are still
    /// reported to the caller. Never retried.
    pub async fn submit_collect(&self, payload: &CollectPayload) -> Result<()> {
        debug!(fingerprint = %payload.fingerprint, "submitting collect payload");

        let response = self
            .http
            .post(format!("{}/collect", self.base_url))
            .json(payload)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest("collect", &e))?;

        Self::check_status("collect", response).await?;
        Ok(())
    }

    /// POST a scan request to `/osint-scan` and parse the job response.
    ///
    /// Never retried: a duplicate submission could double billable work
    /// on the remote side.
    pub async fn request_scan(&self, request: &ScanRequest) -> Result<ScanJob> {
        debug!(query = %request.query, "requesting OSINT scan");

        let response = self
            .http
            .post(format!("{}/osint-scan", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest("osint-scan", &e))?;

        let response = Self::check_status("osint-scan", response).await?;

        response
            .json::<ScanJob>()
            .await
            .map_err(|e| ClientError::from_body("osint-scan", &e))
    }

    /// GET `/simulate-tracking?owner=…` and return the raw JSON report.
    ///
    /// Idempotent read: transient failures are retried with exponential
    /// backoff, up to `MAX_SIMULATION_RETRIES` extra attempts.
    pub async fn request_simulation(&self, owner: &str) -> Result<serde_json::Value> {
        let mut attempt: u32 = 0;

        loop {
            match self.simulation_once(owner).await {
                Ok(report) => return Ok(report),
                Err(e) if e.is_transient() && attempt < MAX_SIMULATION_RETRIES => {
                    attempt += 1;
                    let delay = RETRY_DELAY_MS * 2u64.pow(attempt - 1);
                    warn!(
                        attempt,
                        delay_ms = delay,
                        error = %e,
                        "simulation request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn simulation_once(&self, owner: &str) -> Result<serde_json::Value> {
        debug!("requesting tracking simulation");

        let response = self
            .http
            .get(format!("{}/simulate-tracking", self.base_url))
            .query(&[("owner", owner)])
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest("simulate-tracking", &e))?;

        let response = Self::check_status("simulate-tracking", response).await?;

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ClientError::from_body("simulate-tracking", &e))
    }

    async fn check_status(operation: &'static str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ClientError::Http {
                operation,
                status: status.as_u16(),
                message,
            })
        }
    }
}
