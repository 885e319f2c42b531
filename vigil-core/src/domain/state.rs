//! Poll state domain types

use serde::{Deserialize, Serialize};

/// Where a build's report currently stands
///
/// Exactly one value is held per report. `SuccessReport` and `ReportFailed`
/// are terminal; every other state causes a fresh poll on the next access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PollState {
    /// No request attempted yet
    #[default]
    Unset,
    /// Full report received
    SuccessReport,
    /// Service is still generating the report
    ReportInProgress,
    /// Explicit failure, or the retry budget ran out
    ReportFailed,
    /// Transport failed; try again on the next poll
    RetryReport,
    /// Service answered HTTP 429
    RateLimited,
    /// A test-level report exists before the full one. Sticky: later
    /// transport errors and non-2xx responses leave it in place.
    TestAvailable,
}

impl PollState {
    /// Whether automatic polling stops in this state
    pub fn is_terminal(self) -> bool {
        matches!(self, PollState::SuccessReport | PollState::ReportFailed)
    }

    /// Whether report content is available for display
    pub fn has_report(self) -> bool {
        matches!(self, PollState::SuccessReport | PollState::TestAvailable)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PollState::Unset => "UNSET",
            PollState::SuccessReport => "SUCCESS_REPORT",
            PollState::ReportInProgress => "REPORT_IN_PROGRESS",
            PollState::ReportFailed => "REPORT_FAILED",
            PollState::RetryReport => "RETRY_REPORT",
            PollState::RateLimited => "RATE_LIMIT",
            PollState::TestAvailable => "TEST_AVAILABLE",
        }
    }
}

impl std::fmt::Display for PollState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
