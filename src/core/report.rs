//! The final threat-assessment report.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scan verdict. Malicious iff the final score exceeds the configured
/// threshold (6 by default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Malicious,
    Clean,
}

/// Where a network indicator came from.
///
/// `Synthetic` marks the placeholder indicator injected for display purposes
/// when a high-suspicion artifact yields no extractable address; it is never
/// an extraction claim and must stay distinguishable from `Observed` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorOrigin {
    Observed,
    Synthetic,
}

/// An ordered network indicator entry (at most 5 per report).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkIndicator {
    pub ip: String,
    pub proto: String,
    pub origin: IndicatorOrigin,
}

/// Non-network artifacts extracted during the scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intelligence {
    pub wallets: Vec<String>,
    pub urls: Vec<String>,
    pub emails: Vec<String>,
}

/// The immutable result of one artifact scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Final score, clamped to 0..=10.
    pub score: u32,
    pub verdict: Verdict,
    /// Heuristic family label, `Heur.<score>` unless attributed.
    pub family: String,
    /// Deduplicated behavioral tags; `{"clean"}` when nothing matched.
    pub tags: BTreeSet<String>,
    /// PE import hash, `"N/A"` when the artifact is not a parseable PE.
    pub import_hash: String,
    /// score * 9; 90 at the ceiling, deliberately not rescaled.
    pub attribution_confidence: u32,
    /// Attributed actor, `"Unknown"` unless a database match or the
    /// high-risk fallback applies.
    pub actor: String,
    pub network: Vec<NetworkIndicator>,
    pub intelligence: Intelligence,
    /// MD5 of the scanned buffer.
    pub md5: String,
    pub scanned_at: DateTime<Utc>,
}

impl Report {
    /// True when the report carries only the default `clean` tag.
    pub fn is_unremarkable(&self) -> bool {
        self.tags.len() == 1 && self.tags.contains("clean")
    }
}
