//! Error types for the carcharoth scan pipeline.
//!
//! Only a small set of failures ever surfaces to the caller: a missing
//! artifact, an I/O failure while reading it, or a malformed scan handle.
//! Everything else (malformed PE structures, missing optional capabilities)
//! is recovered inside the pipeline and degrades to zero findings.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scan operations.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Artifact path does not exist
    #[error("artifact not found: {path}")]
    NotFound { path: PathBuf },

    /// I/O failure reading the artifact
    #[error("failed to read artifact {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed structures inside the artifact; recovered locally by the
    /// analyzer that hit it and never aborts a scan
    #[error("parse error: {0}")]
    Parse(String),

    /// An optional analyzer dependency is missing on this host; recovered
    /// locally, the pipeline continues without it
    #[error("capability unavailable: {0}")]
    CapabilityUnavailable(&'static str),

    /// Malformed scan-identifier token on result retrieval
    #[error("invalid scan handle: {0}")]
    InvalidHandle(String),
}

/// Result type alias for scan operations
pub type Result<T> = std::result::Result<T, ScanError>;
