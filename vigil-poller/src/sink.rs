//! Artifact persistence
//!
//! The poller hands every successfully classified report to an
//! [`ArtifactSink`]. Failures here are reported to the caller of `persist`
//! but never reach the poller's state.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Directory, relative to the sink root, that receives the report
pub const REPORT_FOLDER: &str = "browserstack-artifacts";

/// File name of the archived report
pub const REPORT_FILE_NAME: &str = "browserstack-report.html";

/// Destination for the standalone report document
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Durably writes `document` as `dir/file_name`
    async fn persist(&self, dir: &str, file_name: &str, document: &str) -> Result<()>;
}

/// Writes artifacts below a root directory on the local filesystem
#[derive(Debug, Clone)]
pub struct FsArtifactSink {
    root: PathBuf,
}

impl FsArtifactSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ArtifactSink for FsArtifactSink {
    async fn persist(&self, dir: &str, file_name: &str, document: &str) -> Result<()> {
        let target_dir = self.root.join(dir);
        tokio::fs::create_dir_all(&target_dir)
            .await
            .with_context(|| format!("Failed to create {}", target_dir.display()))?;

        let path = target_dir.join(file_name);
        tokio::fs::write(&path, document)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!("Archived report to {}", path.display());
        Ok(())
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullArtifactSink;

#[async_trait]
impl ArtifactSink for NullArtifactSink {
    async fn persist(&self, _dir: &str, _file_name: &str, _document: &str) -> Result<()> {
        Ok(())
    }
}
