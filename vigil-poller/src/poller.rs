//! Report poller
//!
//! Owns one build's [`ReportRecord`] and advances it by at most one network
//! request per accessor call. There is no timer here: whoever reads the
//! report (a UI render, the CLI's tick) decides how often polling happens.

use std::sync::Arc;
use tracing::{debug, info, warn};
use vigil_client::ReportServiceClient;
use vigil_core::domain::build::{BuildIdentity, Credentials};
use vigil_core::domain::report::ReportRecord;
use vigil_core::domain::state::PollState;
use vigil_core::dto::report::ReportRequest;

use crate::sink::{ArtifactSink, REPORT_FILE_NAME, REPORT_FOLDER};
use crate::transition::{PollOutcome, transition};

/// Polls the report service for a single build
pub struct ReportPoller {
    build: BuildIdentity,
    credentials: Credentials,
    client: Arc<dyn ReportServiceClient>,
    sink: Arc<dyn ArtifactSink>,
    record: ReportRecord,
}

impl ReportPoller {
    /// Creates a poller with a fresh record
    pub fn new(
        build: BuildIdentity,
        credentials: Credentials,
        client: Arc<dyn ReportServiceClient>,
        sink: Arc<dyn ArtifactSink>,
    ) -> Self {
        Self {
            build,
            credentials,
            client,
            sink,
            record: ReportRecord::new(),
        }
    }

    /// Returns the rich report html, polling first unless the state is terminal
    pub async fn report_html(&mut self) -> Option<&str> {
        self.ensure_fetched().await;
        self.record.html.as_deref()
    }

    /// Returns the report stylesheet, polling first unless the state is terminal
    pub async fn report_style(&mut self) -> &str {
        self.ensure_fetched().await;
        &self.record.style
    }

    /// Runs the ensure-fetched step on its own and returns the resulting state
    pub async fn poll(&mut self) -> PollState {
        self.ensure_fetched().await;
        self.record.state
    }

    pub fn state(&self) -> PollState {
        self.record.state
    }

    pub fn record(&self) -> &ReportRecord {
        &self.record
    }

    pub fn build(&self) -> &BuildIdentity {
        &self.build
    }

    pub fn is_report_in_progress(&self) -> bool {
        self.record.state == PollState::ReportInProgress
    }

    pub fn is_report_failed(&self) -> bool {
        self.record.state == PollState::ReportFailed
    }

    pub fn is_user_rate_limited(&self) -> bool {
        self.record.state == PollState::RateLimited
    }

    /// True for both the full and the partial (test-level) report
    pub fn is_report_available(&self) -> bool {
        self.record.state.has_report()
    }

    pub fn is_report_test_available(&self) -> bool {
        self.record.state == PollState::TestAvailable
    }

    pub fn report_retry_required(&self) -> bool {
        self.record.state == PollState::RetryReport
    }

    /// Whether there is a status worth showing in place of a report
    pub fn report_has_status(&self) -> bool {
        matches!(
            self.record.state,
            PollState::ReportInProgress | PollState::ReportFailed
        )
    }

    async fn ensure_fetched(&mut self) {
        if self.record.needs_fetch() {
            self.fetch_report().await;
        }
    }

    /// Performs one poll and applies it to the record
    async fn fetch_report(&mut self) {
        let request = ReportRequest::poll(&self.build);
        self.record.polls += 1;
        self.record.last_polled_at = Some(chrono::Utc::now());

        let outcome = match self.client.fetch_report(&self.credentials, &request).await {
            Ok(response) if response.is_success() => match response.parse() {
                Ok(body) => PollOutcome::Responded(body),
                Err(e) => {
                    warn!("Unreadable report response for '{}': {}", self.build.name, e);
                    PollOutcome::TransportFailed
                }
            },
            Ok(response) => PollOutcome::Rejected {
                status: response.status,
            },
            Err(e) => {
                warn!("Report poll for '{}' failed: {}", self.build.name, e);
                PollOutcome::TransportFailed
            }
        };

        let previous = self.record.state;
        let artifact = transition(&mut self.record, outcome);

        if let Some(document) = artifact {
            if let Err(e) = self
                .sink
                .persist(REPORT_FOLDER, REPORT_FILE_NAME, &document)
                .await
            {
                warn!("Failed to archive report for '{}': {:#}", self.build.name, e);
            }
        }

        if previous != self.record.state {
            info!(
                "Report for '{}': {} -> {}",
                self.build.name, previous, self.record.state
            );
        } else {
            debug!("Report for '{}' still {}", self.build.name, self.record.state);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use vigil_client::{ClientError, RawResponse};
    use vigil_core::domain::report::NO_REPORT_HTML;

    /// One scripted reply of [`ScriptedClient`]
    pub(crate) enum Step {
        Fail,
        Respond(u16, String),
    }

    pub(crate) fn ok(status: &str) -> Step {
        Step::Respond(
            200,
            serde_json::json!({
                "reportStatus": status,
                "report": {
                    "richHtml": "<div>rich</div>",
                    "richCss": ".rich{}",
                    "basicHtml": "<p>basic</p>",
                },
            })
            .to_string(),
        )
    }

    /// Replays a fixed sequence of responses and counts requests
    #[derive(Default)]
    pub(crate) struct ScriptedClient {
        steps: Mutex<VecDeque<Step>>,
        calls: AtomicUsize,
        requests: Mutex<Vec<ReportRequest>>,
    }

    impl ScriptedClient {
        pub(crate) fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                steps: Mutex::new(steps.into()),
                ..Default::default()
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReportServiceClient for ScriptedClient {
        async fn fetch_report(
            &self,
            _credentials: &Credentials,
            request: &ReportRequest,
        ) -> vigil_client::Result<RawResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            match self.steps.lock().unwrap().pop_front() {
                Some(Step::Respond(status, body)) => Ok(RawResponse::new(status, body)),
                Some(Step::Fail) | None => Err(ClientError::RequestFailed(
                    reqwest_error(),
                )),
            }
        }
    }

    /// A transport-level error without touching the network
    fn reqwest_error() -> reqwest::Error {
        reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err()
    }

    /// Keeps every persisted document
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) writes: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl ArtifactSink for RecordingSink {
        async fn persist(&self, dir: &str, file_name: &str, document: &str) -> anyhow::Result<()> {
            self.writes.lock().unwrap().push((
                dir.to_string(),
                file_name.to_string(),
                document.to_string(),
            ));
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl ArtifactSink for FailingSink {
        async fn persist(&self, _: &str, _: &str, _: &str) -> anyhow::Result<()> {
            Err(anyhow!("disk full"))
        }
    }

    pub(crate) fn poller_with(
        client: Arc<ScriptedClient>,
        sink: Arc<dyn ArtifactSink>,
    ) -> ReportPoller {
        ReportPoller::new(
            BuildIdentity::new("nightly", "1700000000000"),
            Credentials::new("alice", "key"),
            client,
            sink,
        )
    }

    #[tokio::test]
    async fn test_completed_report_is_fetched_once() {
        let client = ScriptedClient::new(vec![ok("COMPLETED")]);
        let mut poller = poller_with(client.clone(), Arc::new(RecordingSink::default()));

        assert_eq!(poller.report_html().await, Some("<div>rich</div>"));
        assert_eq!(poller.report_html().await, Some("<div>rich</div>"));
        assert_eq!(poller.report_style().await, ".rich{}");

        assert_eq!(client.calls(), 1);
        assert_eq!(poller.record().polls, 1);
        assert!(poller.is_report_available());
        assert!(!poller.is_report_test_available());
        assert!(!poller.report_has_status());
    }

    #[tokio::test]
    async fn test_failed_report_is_not_polled_again() {
        let client = ScriptedClient::new(vec![Step::Respond(500, "boom".to_string())]);
        let mut poller = poller_with(client.clone(), Arc::new(RecordingSink::default()));

        assert_eq!(poller.report_html().await, None);
        assert_eq!(poller.report_html().await, None);

        assert_eq!(client.calls(), 1);
        assert!(poller.is_report_failed());
        assert!(poller.report_has_status());
    }

    #[tokio::test]
    async fn test_request_payload() {
        let client = ScriptedClient::new(vec![ok("IN_PROGRESS")]);
        let mut poller = poller_with(client.clone(), Arc::new(RecordingSink::default()));

        poller.poll().await;

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0], ReportRequest::poll(poller.build()));
        assert_eq!(requests[0].original_build_name, "nightly");
        assert_eq!(requests[0].build_started_at, "1700000000000");
        assert_eq!(requests[0].user_timeout, "120");
    }

    #[tokio::test]
    async fn test_in_progress_polls_on_every_access() {
        let client = ScriptedClient::new(vec![ok("IN_PROGRESS"), ok("IN_PROGRESS"), ok("COMPLETED")]);
        let mut poller = poller_with(client.clone(), Arc::new(RecordingSink::default()));

        assert_eq!(poller.report_html().await, None);
        assert!(poller.is_report_in_progress());
        assert!(poller.report_has_status());

        assert_eq!(poller.report_style().await, "");
        assert!(poller.is_report_in_progress());

        assert_eq!(poller.report_html().await, Some("<div>rich</div>"));
        assert_eq!(poller.state(), PollState::SuccessReport);
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn test_transport_failures_then_give_up() {
        let client = ScriptedClient::new(vec![Step::Fail, Step::Fail, Step::Fail, Step::Fail]);
        let mut poller = poller_with(client.clone(), Arc::new(RecordingSink::default()));

        for _ in 0..3 {
            assert_eq!(poller.poll().await, PollState::RetryReport);
            assert!(poller.report_retry_required());
        }
        assert_eq!(poller.poll().await, PollState::ReportFailed);
        assert_eq!(poller.record().remaining_retries, -1);

        assert_eq!(poller.poll().await, PollState::ReportFailed);
        assert_eq!(client.calls(), 4);
    }

    #[tokio::test]
    async fn test_malformed_body_counts_as_transport_failure() {
        let client = ScriptedClient::new(vec![Step::Respond(200, "<html>proxy</html>".to_string())]);
        let mut poller = poller_with(client, Arc::new(RecordingSink::default()));

        assert_eq!(poller.poll().await, PollState::RetryReport);
        assert_eq!(poller.record().remaining_retries, 2);
    }

    #[tokio::test]
    async fn test_non_string_status_fails_without_retry() {
        let client = ScriptedClient::new(vec![Step::Respond(
            200,
            r#"{"reportStatus":42}"#.to_string(),
        )]);
        let mut poller = poller_with(client.clone(), Arc::new(RecordingSink::default()));

        assert_eq!(poller.poll().await, PollState::ReportFailed);
        assert_eq!(poller.record().remaining_retries, 3);
        assert_eq!(poller.report_html().await, None);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_non_object_report_uses_fallback() {
        let client = ScriptedClient::new(vec![Step::Respond(
            200,
            r#"{"reportStatus":"COMPLETED","report":"oops"}"#.to_string(),
        )]);
        let sink = Arc::new(RecordingSink::default());
        let mut poller = poller_with(client, sink.clone());

        assert_eq!(poller.report_html().await, Some(NO_REPORT_HTML));
        assert_eq!(poller.report_style().await, "");
        assert_eq!(poller.state(), PollState::SuccessReport);
        assert!(sink.writes.lock().unwrap()[0].2.contains(NO_REPORT_HTML));
    }

    #[tokio::test]
    async fn test_error_status_with_empty_body() {
        let client = ScriptedClient::new(vec![
            Step::Respond(429, String::new()),
            Step::Respond(503, String::new()),
        ]);
        let mut poller = poller_with(client, Arc::new(RecordingSink::default()));

        assert_eq!(poller.poll().await, PollState::RateLimited);
        assert_eq!(poller.poll().await, PollState::ReportFailed);
        assert_eq!(poller.record().remaining_retries, 3);
    }

    #[tokio::test]
    async fn test_rate_limited_then_recovers() {
        let client = ScriptedClient::new(vec![
            Step::Respond(429, "Too Many Requests".to_string()),
            ok("COMPLETED"),
        ]);
        let mut poller = poller_with(client.clone(), Arc::new(RecordingSink::default()));

        assert_eq!(poller.poll().await, PollState::RateLimited);
        assert!(poller.is_user_rate_limited());
        assert!(!poller.report_has_status());

        assert_eq!(poller.poll().await, PollState::SuccessReport);
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_test_available_keeps_polling_and_stays_sticky() {
        let client = ScriptedClient::new(vec![
            ok("TEST_AVAILABLE"),
            Step::Fail,
            Step::Respond(429, String::new()),
            Step::Respond(502, String::new()),
            ok("COMPLETED"),
        ]);
        let mut poller = poller_with(client.clone(), Arc::new(RecordingSink::default()));

        assert_eq!(poller.report_html().await, Some("<div>rich</div>"));
        assert!(poller.is_report_test_available());
        assert!(poller.is_report_available());

        for _ in 0..3 {
            assert_eq!(poller.poll().await, PollState::TestAvailable);
            assert_eq!(poller.record().remaining_retries, 3);
        }

        assert_eq!(poller.poll().await, PollState::SuccessReport);
        assert_eq!(client.calls(), 5);
    }

    #[tokio::test]
    async fn test_success_archives_basic_document() {
        let client = ScriptedClient::new(vec![ok("NOT_AVAILABLE")]);
        let sink = Arc::new(RecordingSink::default());
        let mut poller = poller_with(client, sink.clone());

        poller.poll().await;

        let writes = sink.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        let (dir, file_name, document) = &writes[0];
        assert_eq!(dir, REPORT_FOLDER);
        assert_eq!(file_name, REPORT_FILE_NAME);
        assert!(document.contains("<p>basic</p>"));
        assert!(!document.contains("<div>rich</div>"));
    }

    #[tokio::test]
    async fn test_missing_report_object() {
        let client = ScriptedClient::new(vec![Step::Respond(
            200,
            r#"{"reportStatus":"completed"}"#.to_string(),
        )]);
        let sink = Arc::new(RecordingSink::default());
        let mut poller = poller_with(client, sink.clone());

        assert_eq!(poller.report_html().await, Some(NO_REPORT_HTML));
        assert_eq!(poller.report_style().await, "");
        assert!(sink.writes.lock().unwrap()[0].2.contains(NO_REPORT_HTML));
    }

    #[tokio::test]
    async fn test_sink_failure_is_swallowed() {
        let client = ScriptedClient::new(vec![ok("COMPLETED")]);
        let mut poller = poller_with(client, Arc::new(FailingSink));

        assert_eq!(poller.report_html().await, Some("<div>rich</div>"));
        assert_eq!(poller.report_style().await, ".rich{}");
        assert_eq!(poller.state(), PollState::SuccessReport);
    }

    #[tokio::test]
    async fn test_accessors_do_not_poll() {
        let client = ScriptedClient::new(vec![]);
        let poller = poller_with(client.clone(), Arc::new(RecordingSink::default()));

        assert!(!poller.is_report_in_progress());
        assert!(!poller.is_report_failed());
        assert!(!poller.is_user_rate_limited());
        assert!(!poller.is_report_available());
        assert!(!poller.is_report_test_available());
        assert!(!poller.report_retry_required());
        assert!(!poller.report_has_status());
        assert_eq!(poller.state(), PollState::Unset);
        assert_eq!(client.calls(), 0);
    }
}
