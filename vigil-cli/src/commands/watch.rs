//! Watch command
//!
//! Plays the part of the page that keeps re-rendering until the report is
//! final: one poll per tick, nothing more.

use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time;
use tracing::info;
use vigil_core::domain::state::PollState;
use vigil_poller::ReportPoller;

use crate::output::{outcome, print_state, standalone_page};

pub struct WatchOptions {
    pub interval: Duration,
    pub max_polls: u32,
    pub output: Option<PathBuf>,
}

/// Polls until a terminal state or the poll limit
pub async fn handle_watch(mut poller: ReportPoller, options: WatchOptions) -> Result<()> {
    info!(
        "Watching report for '{}' (interval: {:?}, max polls: {})",
        poller.build().name,
        options.interval,
        options.max_polls
    );

    let mut ticker = time::interval(options.interval);

    loop {
        ticker.tick().await;

        let state = poller.poll().await;
        print_state(poller.record());

        if state.is_terminal() {
            break;
        }

        if poller.record().polls >= options.max_polls {
            println!(
                "{}",
                format!("Stopped after {} poll(s)", poller.record().polls).yellow()
            );
            break;
        }
    }

    if let Some(path) = &options.output {
        if let Some(html) = &poller.record().html {
            let page = standalone_page(html, &poller.record().style);
            tokio::fs::write(path, page)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} {}", "Report written to".green(), path.display());
        }
    }

    match poller.state() {
        PollState::SuccessReport | PollState::ReportFailed | PollState::RateLimited => {
            outcome(poller.state())
        }
        PollState::TestAvailable => {
            println!("{}", "Only the test-level report is available".yellow());
            Ok(())
        }
        state => anyhow::bail!(
            "Report not ready after {} poll(s) (last state: {})",
            poller.record().polls,
            state
        ),
    }
}
