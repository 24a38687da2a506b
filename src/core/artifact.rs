//! The artifact under analysis.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::IoConfig;
use crate::error::{Result, ScanError};
use crate::hashing::md5_digest;

/// An immutable byte buffer with filesystem identity.
///
/// Owned exclusively by a single pipeline invocation; analyzers only ever see
/// `&[u8]`, so nothing can mutate it mid-scan.
#[derive(Debug, Clone)]
pub struct Artifact {
    data: Vec<u8>,
    path: PathBuf,
    md5: String,
}

impl Artifact {
    /// Load an artifact from disk, bounded by the configured I/O limits.
    ///
    /// A missing path maps to [`ScanError::NotFound`]; any read failure,
    /// including a file over the size ceiling, maps to [`ScanError::Read`].
    pub fn from_path<P: AsRef<Path>>(path: P, io: &IoConfig) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScanError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let read_err = |source: std::io::Error| ScanError::Read {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(read_err)?;
        let size = file.metadata().map_err(read_err)?.len();
        if size > io.max_file_size {
            return Err(read_err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("file too large: {} bytes (limit: {})", size, io.max_file_size),
            )));
        }

        debug!(path = %path.display(), size_bytes = size, "loading artifact");
        let mut data = Vec::with_capacity(size.min(io.max_read_bytes) as usize);
        file.take(io.max_read_bytes)
            .read_to_end(&mut data)
            .map_err(read_err)?;

        info!(path = %path.display(), bytes = data.len(), "artifact loaded");
        Ok(Self::from_bytes(data, path))
    }

    /// Wrap an in-memory buffer as an artifact.
    pub fn from_bytes<P: AsRef<Path>>(data: Vec<u8>, path: P) -> Self {
        let md5 = md5_digest(&data);
        Self {
            data,
            path: path.as_ref().to_path_buf(),
            md5,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lowercase hex MD5 of the buffer contents.
    pub fn md5(&self) -> &str {
        &self.md5
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
