//! Single poll command

use anyhow::Result;
use vigil_poller::ReportPoller;

use crate::output::{outcome, print_state};

/// Performs one poll and reports the state
pub async fn handle_poll(mut poller: ReportPoller) -> Result<()> {
    let state = poller.poll().await;
    print_state(poller.record());
    outcome(state)
}
