//! Scan client: handle issuance and report retrieval.
//!
//! Local mode runs the pipeline on this machine and issues composite
//! `LOCAL|path|md5` handles. Hybrid mode (an API key is present) pretends to
//! upload to a cloud provider and returns canned data; the protocol itself
//! is out of scope, only the handle contract is real.

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::path::Path;

use tracing::info;

use crate::aggregate;
use crate::core::handle::ScanHandle;
use crate::core::report::{Intelligence, Report, Verdict};
use crate::error::{Result, ScanError};
use crate::hashing::md5_digest;
use crate::pipeline::ScanPipeline;

/// Environment variable consulted for hybrid mode.
pub const API_KEY_ENV: &str = "CARCHAROTH_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMode {
    LocalOnly,
    Hybrid,
}

/// Result of submitting an artifact.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Correlation token to retrieve the report with.
    pub handle: String,
    pub message: String,
}

/// A scan client wrapping one configured pipeline.
pub struct ScanClient<'db> {
    pipeline: ScanPipeline<'db>,
    mode: ClientMode,
}

impl<'db> ScanClient<'db> {
    /// Mode is decided by the `CARCHAROTH_API_KEY` environment variable.
    pub fn new(pipeline: ScanPipeline<'db>) -> Self {
        let key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        Self::with_api_key(pipeline, key)
    }

    pub fn with_api_key(pipeline: ScanPipeline<'db>, api_key: Option<String>) -> Self {
        let mode = if api_key.is_some() {
            ClientMode::Hybrid
        } else {
            ClientMode::LocalOnly
        };
        Self { pipeline, mode }
    }

    pub fn mode(&self) -> ClientMode {
        self.mode
    }

    /// Submit an artifact and receive a retrieval handle.
    pub fn submit<P: AsRef<Path>>(&self, path: P) -> Result<Submission> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScanError::NotFound {
                path: path.to_path_buf(),
            });
        }

        if self.mode == ClientMode::Hybrid {
            let handle = format!("CLOUD-{}", cloud_submission_id(path));
            info!(handle = %handle, "uploaded to cloud provider (stub)");
            return Ok(Submission {
                handle,
                message: "uploaded to cloud provider".to_string(),
            });
        }

        let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        // Identity only; a read failure here still issues a handle and the
        // actual scan reports the error on retrieval.
        let md5 = match std::fs::read(&absolute) {
            Ok(data) => md5_digest(&data),
            Err(_) => "unknown".to_string(),
        };
        let handle = ScanHandle::local(&absolute, md5).to_string();
        info!(handle = %handle, "local engine ready");
        Ok(Submission {
            handle,
            message: "local engine ready".to_string(),
        })
    }

    /// Resolve a handle back into a report.
    ///
    /// Local handles re-run the pipeline over the referenced path. Cloud
    /// handles return the canned stub result in hybrid mode and are rejected
    /// as invalid in local-only mode.
    pub fn retrieve(&self, token: &str) -> Result<Report> {
        match ScanHandle::parse(token)? {
            ScanHandle::Local { path, .. } => self.pipeline.scan_file(path),
            ScanHandle::Cloud(id) => {
                if self.mode == ClientMode::Hybrid {
                    Ok(canned_cloud_report(&id, self.pipeline.config()))
                } else {
                    Err(ScanError::InvalidHandle(token.to_string()))
                }
            }
        }
    }
}

fn cloud_submission_id(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    let nanos: i128 = Utc::now().timestamp_nanos_opt().unwrap_or_default().into();
    hasher.update(nanos.to_le_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..6])
}

/// The stub result every cloud retrieval returns.
fn canned_cloud_report(_id: &str, cfg: &crate::config::ScanConfig) -> Report {
    let score = cfg.scoring.max_score;
    Report {
        score,
        verdict: Verdict::Malicious,
        family: "Cloud-Detection".to_string(),
        tags: BTreeSet::from(["cloud-detection".to_string()]),
        import_hash: "N/A".to_string(),
        attribution_confidence: aggregate::confidence_for(score, &cfg.scoring),
        actor: aggregate::actor_for(None, score, &cfg.scoring),
        network: Vec::new(),
        intelligence: Intelligence::default(),
        md5: "cloud".to_string(),
        scanned_at: Utc::now(),
    }
}
