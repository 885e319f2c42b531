//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod poll;
mod watch;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use vigil_client::ReportClient;
use vigil_poller::{ArtifactSink, FsArtifactSink, NullArtifactSink, ReportPoller};

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Send a single poll and print the resulting state
    Poll {
        #[command(flatten)]
        archive: ArchiveArgs,
    },
    /// Poll on a fixed cadence until the report is final
    Watch {
        /// Seconds between polls
        #[arg(short, long, default_value_t = 10)]
        interval: u64,

        /// Give up after this many polls
        #[arg(long, default_value_t = 60)]
        max_polls: u32,

        /// Write the rich report, with its stylesheet, to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        archive: ArchiveArgs,
    },
}

/// Where the standalone report document is archived
#[derive(Args)]
pub struct ArchiveArgs {
    /// Directory that receives the archived report
    #[arg(long, env = "VIGIL_ARTIFACTS", default_value = ".")]
    artifacts: PathBuf,

    /// Do not archive the report
    #[arg(long)]
    no_archive: bool,
}

impl ArchiveArgs {
    fn sink(&self) -> Arc<dyn ArtifactSink> {
        if self.no_archive {
            Arc::new(NullArtifactSink)
        } else {
            Arc::new(FsArtifactSink::new(&self.artifacts))
        }
    }
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Poll { archive } => {
            let poller = build_poller(config, archive.sink())?;
            poll::handle_poll(poller).await
        }
        Commands::Watch {
            interval,
            max_polls,
            output,
            archive,
        } => {
            let poller = build_poller(config, archive.sink())?;
            let options = watch::WatchOptions {
                interval: std::time::Duration::from_secs(interval.max(1)),
                max_polls,
                output,
            };
            watch::handle_watch(poller, options).await
        }
    }
}

fn build_poller(config: &Config, sink: Arc<dyn ArtifactSink>) -> Result<ReportPoller> {
    let client = ReportClient::with_timeout(config.base_url.clone(), config.request_timeout)
        .context("Failed to build HTTP client")?;

    Ok(ReportPoller::new(
        config.build.clone(),
        config.credentials.clone(),
        Arc::new(client),
        sink,
    ))
}
