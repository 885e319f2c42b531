//! Report domain types

use serde::{Deserialize, Serialize};

use super::state::PollState;

/// Number of transport failures tolerated before giving up
pub const MAX_ATTEMPTS: i32 = 3;

/// Shown when the service reports success without any report content
pub const NO_REPORT_HTML: &str = "<h1>No Report Found</h1>";

/// Report state for one build
///
/// Lives as long as the build it belongs to. Only the poller writes to it.
/// `html` is set exactly when `state` is `SuccessReport` or `TestAvailable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub html: Option<String>,
    pub style: String,
    pub state: PollState,
    /// Goes negative on the last tolerated failure, never goes back up
    pub remaining_retries: i32,
    /// Requests issued so far
    pub polls: u32,
    pub last_polled_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl ReportRecord {
    pub fn new() -> Self {
        Self {
            html: None,
            style: String::new(),
            state: PollState::Unset,
            remaining_retries: MAX_ATTEMPTS,
            polls: 0,
            last_polled_at: None,
        }
    }

    /// Whether the next accessor call should hit the network
    pub fn needs_fetch(&self) -> bool {
        !self.state.is_terminal()
    }
}

impl Default for ReportRecord {
    fn default() -> Self {
        Self::new()
    }
}
