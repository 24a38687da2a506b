//! Findings emitted by individual analyzers.

use serde::{Deserialize, Serialize};

/// Which analyzer produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalyzerKind {
    AvBridge,
    Signatures,
    Base64,
    Entropy,
    PeImports,
    Network,
    Intel,
}

/// Indicator-of-compromise kinds collected into report intelligence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IocKind {
    Url,
    Email,
    Wallet,
    Ip,
}

/// A single extracted indicator value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ioc {
    pub kind: IocKind,
    pub value: String,
}

/// One analyzer observation: a tag, a score contribution, and optionally an
/// extracted indicator.
///
/// Findings are append-only; each is produced by exactly one analyzer and
/// consumed only by the aggregation fold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub source: AnalyzerKind,
    pub tag: String,
    pub score_delta: u32,
    pub ioc: Option<Ioc>,
    /// Forces the running score to the ceiling instead of adding a delta.
    /// Set only by an external AV hit or an exact threat-database match.
    pub overrides_score: bool,
}

impl Finding {
    pub fn new(source: AnalyzerKind, tag: impl Into<String>, score_delta: u32) -> Self {
        Self {
            source,
            tag: tag.into(),
            score_delta,
            ioc: None,
            overrides_score: false,
        }
    }

    pub fn with_ioc(mut self, kind: IocKind, value: impl Into<String>) -> Self {
        self.ioc = Some(Ioc {
            kind,
            value: value.into(),
        });
        self
    }

    pub fn with_override(mut self) -> Self {
        self.overrides_score = true;
        self
    }
}
