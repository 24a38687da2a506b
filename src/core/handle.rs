//! Scan identifiers.
//!
//! A handle is the only token a caller holds between submitting an artifact
//! and retrieving its report. It is a correlation token, not a credential:
//! local scans encode `LOCAL|<absolute-path>|<md5-hex>`, cloud submissions
//! carry whatever opaque id the provider assigned.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScanError};

const LOCAL_PREFIX: &str = "LOCAL";
const SEPARATOR: char = '|';

/// A parsed scan identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanHandle {
    /// Artifact analyzed by the local engine.
    Local { path: PathBuf, md5: String },
    /// Opaque id assigned by a cloud provider.
    Cloud(String),
}

impl ScanHandle {
    /// Build a local handle. Separator characters inside the path are
    /// replaced so the rendered token stays splittable.
    pub fn local(path: &Path, md5: impl Into<String>) -> Self {
        let clean = path.display().to_string().replace(SEPARATOR, "_");
        Self::Local {
            path: PathBuf::from(clean),
            md5: md5.into(),
        }
    }

    /// Parse a handle string received from a caller.
    ///
    /// Anything not starting with the local prefix is treated as a cloud id;
    /// a local token with missing segments is rejected as [`ScanError::InvalidHandle`].
    pub fn parse(token: &str) -> Result<Self> {
        if !token.starts_with(LOCAL_PREFIX) {
            if token.is_empty() {
                return Err(ScanError::InvalidHandle(token.to_string()));
            }
            return Ok(Self::Cloud(token.to_string()));
        }
        let mut parts = token.splitn(3, SEPARATOR);
        let _prefix = parts.next();
        let path = parts.next().unwrap_or_default();
        let md5 = parts.next().unwrap_or_default();
        if path.is_empty() || md5.is_empty() {
            return Err(ScanError::InvalidHandle(token.to_string()));
        }
        Ok(Self::Local {
            path: PathBuf::from(path),
            md5: md5.to_string(),
        })
    }
}

impl fmt::Display for ScanHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { path, md5 } => {
                write!(f, "{}{}{}{}{}", LOCAL_PREFIX, SEPARATOR, path.display(), SEPARATOR, md5)
            }
            Self::Cloud(id) => write!(f, "{}", id),
        }
    }
}
