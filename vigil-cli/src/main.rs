//! Vigil CLI
//!
//! Command-line interface for polling a build's test report.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vigil_core::domain::build::{BuildIdentity, Credentials};

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Poll a build's test report until it is ready", long_about = None)]
struct Cli {
    /// Report service URL
    #[arg(long, env = "VIGIL_BASE_URL", default_value = vigil_client::DEFAULT_BASE_URL)]
    base_url: String,

    /// Account username
    #[arg(long, env = "VIGIL_USERNAME")]
    username: String,

    /// Account access key
    #[arg(long, env = "VIGIL_ACCESS_KEY", hide_env_values = true)]
    access_key: String,

    /// Build name as known to the report service
    #[arg(long, env = "VIGIL_BUILD_NAME")]
    build_name: String,

    /// Build creation timestamp as known to the report service
    #[arg(long, env = "VIGIL_BUILD_STARTED_AT")]
    build_started_at: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "VIGIL_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vigil_cli=info,vigil_poller=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        base_url: cli.base_url,
        credentials: Credentials::new(cli.username, cli.access_key),
        build: BuildIdentity::new(cli.build_name, cli.build_started_at),
        request_timeout: Duration::from_secs(cli.timeout),
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
