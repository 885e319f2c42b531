//! Report state machine
//!
//! One poll produces one [`PollOutcome`]; [`transition`] folds it into the
//! record. The function is pure apart from the record it is handed, so the
//! table below can be tested without a network or a filesystem.
//!
//! | current state   | outcome                      | next state           |
//! |-----------------|------------------------------|----------------------|
//! | `TestAvailable` | transport failure / non-2xx  | `TestAvailable`      |
//! | other           | transport failure            | `RetryReport`, or `ReportFailed` once retries run out |
//! | other           | 429                          | `RateLimited`        |
//! | other           | other non-2xx                | `ReportFailed`       |
//! | any             | `COMPLETED`, `NOT_AVAILABLE` | `SuccessReport`      |
//! | any             | `TEST_AVAILABLE`             | `TestAvailable`      |
//! | any             | `IN_PROGRESS`                | `ReportInProgress`   |
//! | any             | unknown status               | `ReportFailed`       |

use tracing::{debug, warn};
use vigil_core::domain::report::{NO_REPORT_HTML, ReportRecord};
use vigil_core::domain::state::PollState;
use vigil_core::dto::report::{RemoteStatus, Report, ReportResponse};

const TOO_MANY_REQUESTS: u16 = 429;

/// What a single poll produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// No usable response: connect error, timeout, or a 2xx body that is not JSON
    TransportFailed,
    /// The service answered with a non-2xx status
    Rejected { status: u16 },
    /// The service answered 2xx with a parsed body
    Responded(ReportResponse),
}

/// Applies one poll outcome to the record
///
/// Returns the standalone HTML document to archive when the outcome was
/// classified as a success.
#[must_use]
pub fn transition(record: &mut ReportRecord, outcome: PollOutcome) -> Option<String> {
    match outcome {
        PollOutcome::TransportFailed => {
            if record.state == PollState::TestAvailable {
                debug!("Ignoring transport failure, partial report already available");
                return None;
            }
            record.remaining_retries -= 1;
            record.state = if record.remaining_retries >= 0 {
                PollState::RetryReport
            } else {
                PollState::ReportFailed
            };
            None
        }
        PollOutcome::Rejected { status } => {
            if record.state == PollState::TestAvailable {
                debug!("Ignoring HTTP {}, partial report already available", status);
                return None;
            }
            record.state = if status == TOO_MANY_REQUESTS {
                PollState::RateLimited
            } else {
                PollState::ReportFailed
            };
            None
        }
        PollOutcome::Responded(response) => {
            let status = response.status();
            match status {
                RemoteStatus::Completed | RemoteStatus::NotAvailable => {
                    Some(mark_success(record, response.report.as_ref()))
                }
                RemoteStatus::TestAvailable => {
                    let document = mark_success(record, response.report.as_ref());
                    record.state = PollState::TestAvailable;
                    Some(document)
                }
                RemoteStatus::InProgress => {
                    record.state = PollState::ReportInProgress;
                    None
                }
                RemoteStatus::Unknown(raw) => {
                    warn!("Unrecognised report status '{}'", raw);
                    record.state = PollState::ReportFailed;
                    None
                }
            }
        }
    }
}

/// Stores the report content and builds the archive document
fn mark_success(record: &mut ReportRecord, report: Option<&Report>) -> String {
    record.state = PollState::SuccessReport;
    record.html = Some(
        report
            .and_then(|r| r.rich_html.clone())
            .unwrap_or_else(|| NO_REPORT_HTML.to_string()),
    );
    record.style = report.and_then(|r| r.rich_css.clone()).unwrap_or_default();

    let basic_html = report
        .and_then(|r| r.basic_html.as_deref())
        .unwrap_or(NO_REPORT_HTML);
    assemble_document(basic_html)
}

/// Wraps a report fragment in a minimal standalone HTML document
pub fn assemble_document(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"></head><body>{}</body></html>",
        body
    )
}
