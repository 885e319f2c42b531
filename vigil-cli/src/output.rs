//! Terminal rendering of report state

use anyhow::Result;
use colored::*;
use vigil_core::domain::report::ReportRecord;
use vigil_core::domain::state::PollState;

/// Colors a state by how the user should read it
pub fn colored_state(state: PollState) -> ColoredString {
    match state {
        PollState::SuccessReport => state.as_str().green().bold(),
        PollState::TestAvailable => state.as_str().green(),
        PollState::ReportInProgress | PollState::Unset => state.as_str().cyan(),
        PollState::RetryReport | PollState::RateLimited => state.as_str().yellow(),
        PollState::ReportFailed => state.as_str().red().bold(),
    }
}

/// Prints one line per poll
pub fn print_state(record: &ReportRecord) {
    let when = record
        .last_polled_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    println!(
        "[{}] poll #{:<3} {}  {}",
        when.dimmed(),
        record.polls,
        colored_state(record.state),
        format!("retries left: {}", record.remaining_retries.max(0)).dimmed()
    );
}

/// Maps a final state to the process result
pub fn outcome(state: PollState) -> Result<()> {
    match state {
        PollState::ReportFailed => anyhow::bail!("Report generation failed"),
        PollState::RateLimited => anyhow::bail!("Rate limited by the report service"),
        _ => Ok(()),
    }
}

/// Renders the rich report with its stylesheet inlined
pub fn standalone_page(html: &str, style: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><style>{}</style></head><body>{}</body></html>",
        style, html
    )
}
