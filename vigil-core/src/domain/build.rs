//! Build identity and credentials

use serde::{Deserialize, Serialize};

/// Identifies the build whose report is being polled
///
/// Both values are forwarded verbatim; the service matches on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildIdentity {
    pub name: String,
    pub started_at: String,
}

impl BuildIdentity {
    pub fn new(name: impl Into<String>, started_at: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started_at: started_at.into(),
        }
    }
}

/// Account credentials for the report service
///
/// Opaque to the poller; only the transport looks inside.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub access_key: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            access_key: access_key.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("access_key", &"<redacted>")
            .finish()
    }
}
