//! Report DTOs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::build::BuildIdentity;
use crate::{DEFAULT_REPORT_TIMEOUT, INTEGRATION_TOOL_KEY};

/// Report renderings the poller asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportFormat {
    RichHtml,
    BasicHtml,
}

/// Kind of report request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    Poll,
}

/// Body of a report-status request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub build_started_at: String,
    pub original_build_name: String,
    pub requesting_ci: String,
    pub report_format: Vec<ReportFormat>,
    pub request_type: RequestType,
    pub user_timeout: String,
}

impl ReportRequest {
    /// Builds the poll request for a build
    pub fn poll(build: &BuildIdentity) -> Self {
        Self {
            build_started_at: build.started_at.clone(),
            original_build_name: build.name.clone(),
            requesting_ci: INTEGRATION_TOOL_KEY.to_string(),
            report_format: vec![ReportFormat::RichHtml, ReportFormat::BasicHtml],
            request_type: RequestType::Poll,
            user_timeout: DEFAULT_REPORT_TIMEOUT.to_string(),
        }
    }
}

/// Report content as returned by the service
///
/// Fields of the wrong JSON type read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default, deserialize_with = "string_or_none")]
    pub rich_html: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub rich_css: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub basic_html: Option<String>,
}

/// Body of a successful report-status response
///
/// A non-string `reportStatus` reads as absent (and so as an unknown
/// status); a `report` that is not an object reads as no report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    #[serde(default, deserialize_with = "string_or_none")]
    pub report_status: Option<String>,
    #[serde(default, deserialize_with = "object_or_none")]
    pub report: Option<Report>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn object_or_none<'de, D>(deserializer: D) -> Result<Option<Report>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        object @ Value::Object(_) => Ok(serde_json::from_value(object).ok()),
        _ => Ok(None),
    }
}

impl ReportResponse {
    pub fn status(&self) -> RemoteStatus {
        RemoteStatus::parse(self.report_status.as_deref().unwrap_or_default())
    }
}

/// `reportStatus` values the service is known to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    Completed,
    NotAvailable,
    TestAvailable,
    InProgress,
    /// Anything else, kept verbatim for logging
    Unknown(String),
}

impl RemoteStatus {
    /// Parses a status, ignoring case
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "COMPLETED" => RemoteStatus::Completed,
            "NOT_AVAILABLE" => RemoteStatus::NotAvailable,
            "TEST_AVAILABLE" => RemoteStatus::TestAvailable,
            "IN_PROGRESS" => RemoteStatus::InProgress,
            _ => RemoteStatus::Unknown(raw.to_string()),
        }
    }
}
