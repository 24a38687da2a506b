//! Mass-hunt batch scanning.
//!
//! Every file's pipeline is fully independent, so batches run on a bounded
//! rayon worker pool with no locking. Results are collected unordered; a
//! failed file yields its error alongside the successes (never a partial
//! report) and the caller decides how to tabulate.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::info;

use crate::core::report::Report;
use crate::error::Result;
use crate::pipeline::ScanPipeline;

/// Outcome of one file in a batch.
pub struct BatchEntry {
    pub path: PathBuf,
    pub result: Result<Report>,
}

/// Scan many files on the worker pool, one artifact per task.
pub fn scan_batch<P: AsRef<Path> + Sync>(
    pipeline: &ScanPipeline<'_>,
    paths: &[P],
) -> Vec<BatchEntry> {
    info!(files = paths.len(), "mass hunt started");
    let entries: Vec<BatchEntry> = paths
        .par_iter()
        .map(|p| BatchEntry {
            path: p.as_ref().to_path_buf(),
            result: pipeline.scan_file(p.as_ref()),
        })
        .collect();
    let flagged = entries
        .iter()
        .filter(|e| matches!(&e.result, Ok(r) if r.score >= 5))
        .count();
    info!(files = entries.len(), flagged, "mass hunt complete");
    entries
}
