//! Host adapter
//!
//! Hosts that render a build page (a CI plugin, a dashboard) attach one
//! [`ReportAction`] per build. It carries the link metadata the host shows
//! and forwards every report accessor to the owned poller.

use vigil_core::domain::build::BuildIdentity;
use vigil_core::domain::state::PollState;

use crate::poller::ReportPoller;

pub const DISPLAY_NAME: &str = "BrowserStack Test Report";
pub const ICON_FILE_NAME: &str = "/plugin/browserstack-integration/images/logo.png";
pub const URL_NAME: &str = "testReportBrowserStack";

/// Per-build report page
pub struct ReportAction {
    poller: ReportPoller,
}

impl ReportAction {
    pub fn new(poller: ReportPoller) -> Self {
        Self { poller }
    }

    pub fn display_name(&self) -> &'static str {
        DISPLAY_NAME
    }

    pub fn icon_file_name(&self) -> &'static str {
        ICON_FILE_NAME
    }

    pub fn url_name(&self) -> &'static str {
        URL_NAME
    }

    pub fn build(&self) -> &BuildIdentity {
        self.poller.build()
    }

    pub fn state(&self) -> PollState {
        self.poller.state()
    }

    pub async fn report_html(&mut self) -> Option<&str> {
        self.poller.report_html().await
    }

    pub async fn report_style(&mut self) -> &str {
        self.poller.report_style().await
    }

    pub fn is_report_in_progress(&self) -> bool {
        self.poller.is_report_in_progress()
    }

    pub fn is_report_failed(&self) -> bool {
        self.poller.is_report_failed()
    }

    pub fn is_user_rate_limited(&self) -> bool {
        self.poller.is_user_rate_limited()
    }

    pub fn is_report_available(&self) -> bool {
        self.poller.is_report_available()
    }

    pub fn is_report_test_available(&self) -> bool {
        self.poller.is_report_test_available()
    }

    pub fn report_retry_required(&self) -> bool {
        self.poller.report_retry_required()
    }

    pub fn report_has_status(&self) -> bool {
        self.poller.report_has_status()
    }
}
