//! Vigil HTTP Client
//!
//! A small, type-safe HTTP client for the test-report service.
//!
//! # Example
//!
//! ```no_run
//! use vigil_client::{ReportClient, ReportServiceClient};
//! use vigil_core::domain::build::{BuildIdentity, Credentials};
//! use vigil_core::dto::report::ReportRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ReportClient::new("https://api-observability.browserstack.com");
//!     let credentials = Credentials::new("alice", "access-key");
//!     let build = BuildIdentity::new("nightly", "1700000000000");
//!
//!     let response = client
//!         .fetch_report(&credentials, &ReportRequest::poll(&build))
//!         .await?;
//!     println!("Report endpoint answered {}", response.status);
//!     Ok(())
//! }
//! ```

pub mod error;
mod reports;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use reports::{REPORT_ENDPOINT, RawResponse, ReportServiceClient};

use reqwest::Client;
use std::time::Duration;

/// Default base URL of the report service
pub const DEFAULT_BASE_URL: &str = "https://api-observability.browserstack.com";

/// HTTP client for the report service
#[derive(Debug, Clone)]
pub struct ReportClient {
    /// Base URL of the service (e.g., "https://api-observability.browserstack.com")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ReportClient {
    /// Create a new report client
    ///
    /// # Example
    /// ```
    /// use vigil_client::ReportClient;
    ///
    /// let client = ReportClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new report client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use vigil_client::ReportClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ReportClient::with_client("http://localhost:8080", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
