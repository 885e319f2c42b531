//! Configuration module
//!
//! Connection settings and build identity shared by every command.

use std::time::Duration;
use vigil_core::domain::build::{BuildIdentity, Credentials};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the report service
    pub base_url: String,

    /// Account used for basic auth
    pub credentials: Credentials,

    /// Build whose report is polled
    pub build: BuildIdentity,

    /// Upper bound on a single HTTP request
    pub request_timeout: Duration,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        if self.credentials.username.is_empty() {
            anyhow::bail!("username cannot be empty");
        }

        if self.credentials.access_key.is_empty() {
            anyhow::bail!("access_key cannot be empty");
        }

        if self.build.name.is_empty() {
            anyhow::bail!("build name cannot be empty");
        }

        if self.build.started_at.is_empty() {
            anyhow::bail!("build start time cannot be empty");
        }

        if self.request_timeout.as_secs() == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}
