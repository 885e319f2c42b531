//! Report-status endpoint
//!
//! The poller talks to the service through [`ReportServiceClient`] so tests
//! can script responses without a network.

use async_trait::async_trait;
use tracing::debug;
use vigil_core::domain::build::Credentials;
use vigil_core::dto::report::{ReportRequest, ReportResponse};

use crate::ReportClient;
use crate::error::{ClientError, Result};

/// Path of the report-status endpoint, relative to the base URL
pub const REPORT_ENDPOINT: &str = "/ext/v1/builds/buildReport";

/// An HTTP response, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as a report-status response
    pub fn parse(&self) -> Result<ReportResponse> {
        serde_json::from_str(&self.body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse report response: {}", e)))
    }

    /// Pairs a status with the outcome of reading its body
    ///
    /// Only a 2xx body matters to the caller, so a body that cannot be read
    /// fails the request only when the status is 2xx. Error statuses keep
    /// their status with an empty body.
    pub fn from_parts(status: u16, body: reqwest::Result<String>) -> Result<Self> {
        let body = if (200..300).contains(&status) {
            body?
        } else {
            body.unwrap_or_default()
        };
        Ok(Self::new(status, body))
    }
}

/// Transport for report-status requests
#[async_trait]
pub trait ReportServiceClient: Send + Sync {
    /// Sends one poll request
    ///
    /// Returns `Err` only when no HTTP response was obtained (connect error,
    /// timeout, unreadable body). Every HTTP status, including 4xx and 5xx,
    /// comes back as `Ok`.
    async fn fetch_report(
        &self,
        credentials: &Credentials,
        request: &ReportRequest,
    ) -> Result<RawResponse>;
}

#[async_trait]
impl ReportServiceClient for ReportClient {
    async fn fetch_report(
        &self,
        credentials: &Credentials,
        request: &ReportRequest,
    ) -> Result<RawResponse> {
        let url = format!("{}{}", self.base_url, REPORT_ENDPOINT);
        debug!(
            "Polling report for build '{}' at {}",
            request.original_build_name, url
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&credentials.username, Some(&credentials.access_key))
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        debug!("Report endpoint answered {}", status);

        RawResponse::from_parts(status, response.text().await)
    }
}
