//! Configuration for the scan pipeline.
//!
//! Centralized configuration for all analyzers with sensible defaults.
//! Every threshold the aggregation policy depends on lives here so that
//! tests and embedders can tighten or relax the pipeline without code edits.

use serde::{Deserialize, Serialize};

/// Master configuration for the scan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// I/O limits for artifact loading.
    pub io: IoConfig,
    /// Entropy analysis configuration.
    pub entropy: EntropyConfig,
    /// Signature matching configuration.
    pub signatures: SignatureConfig,
    /// Network indicator extraction configuration.
    pub network: NetworkConfig,
    /// Score aggregation policy.
    pub scoring: ScoringConfig,
}

/// I/O limits for artifact loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoConfig {
    /// Maximum bytes read from a single artifact (default: 10MB).
    pub max_read_bytes: u64,
    /// Maximum artifact size accepted at all (default: 100MB).
    pub max_file_size: u64,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            max_read_bytes: 10 * 1024 * 1024,
            max_file_size: 100 * 1024 * 1024,
        }
    }
}

/// Entropy analysis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntropyConfig {
    /// Overall entropy above this value tags the artifact as packed.
    pub packed_threshold: f64,
    /// Score contribution of the packed tag.
    pub packed_score: u32,
}

impl Default for EntropyConfig {
    fn default() -> Self {
        Self {
            packed_threshold: 7.2,
            packed_score: 3,
        }
    }
}

/// Signature matching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureConfig {
    /// Score contribution of each rule-engine match.
    pub rule_score: u32,
    /// Score contribution of each literal-table tag (first match only).
    pub literal_score: u32,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            rule_score: 4,
            literal_score: 3,
        }
    }
}

/// Network indicator extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Maximum number of indicators kept in a report.
    pub max_indicators: usize,
    /// Running score above which an empty extraction synthesizes the
    /// placeholder indicator.
    pub placeholder_threshold: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            max_indicators: 5,
            placeholder_threshold: 8,
        }
    }
}

/// Score aggregation policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Visible scores are clamped to this ceiling; overrides force it.
    pub max_score: u32,
    /// Final score strictly above this is Malicious.
    pub malicious_threshold: u32,
    /// Final score strictly above this with an unknown actor assigns the
    /// generic high-risk actor label.
    pub high_risk_threshold: u32,
    /// attribution_confidence = score * confidence_factor.
    pub confidence_factor: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_score: 10,
            malicious_threshold: 6,
            high_risk_threshold: 8,
            confidence_factor: 9,
        }
    }
}
