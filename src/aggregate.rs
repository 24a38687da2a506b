//! Score aggregation policy.
//!
//! A pure fold over findings with no state kept between artifacts. Deltas
//! accumulate monotonically; an override finding (external AV hit, exact
//! threat-database match) forces the running total to the ceiling instead of
//! adding, and later deltas still execute. The visible score stays clamped.

use std::collections::BTreeSet;

use crate::config::ScoringConfig;
use crate::core::finding::Finding;
use crate::core::report::Verdict;

/// Default tag when nothing matched at all.
pub const CLEAN_TAG: &str = "clean";

/// Actor label for unattributed artifacts.
pub const UNKNOWN_ACTOR: &str = "Unknown";

/// Fallback actor label for high scores without attribution.
pub const HIGH_RISK_ACTOR: &str = "High-Risk Threat Actor";

/// Running fold state for one artifact.
#[derive(Debug)]
pub struct ScoreFold<'a> {
    cfg: &'a ScoringConfig,
    total: u32,
    overridden: bool,
    tags: BTreeSet<String>,
}

/// Final aggregation result.
#[derive(Debug)]
pub struct ScoreSummary {
    /// Clamped to `0..=max_score`.
    pub score: u32,
    pub overridden: bool,
    /// Deduplicated; `{"clean"}` when empty.
    pub tags: BTreeSet<String>,
}

impl<'a> ScoreFold<'a> {
    pub fn new(cfg: &'a ScoringConfig) -> Self {
        Self {
            cfg,
            total: 0,
            overridden: false,
            tags: BTreeSet::new(),
        }
    }

    /// Fold one finding into the state.
    pub fn apply(&mut self, finding: &Finding) {
        if finding.overrides_score {
            self.total = self.total.max(self.cfg.max_score);
            self.overridden = true;
        }
        self.total = self.total.saturating_add(finding.score_delta);
        self.tags.insert(finding.tag.clone());
    }

    pub fn apply_all<'f>(&mut self, findings: impl IntoIterator<Item = &'f Finding>) {
        for f in findings {
            self.apply(f);
        }
    }

    /// Unclamped running total, used mid-pipeline by the network step's
    /// placeholder policy.
    pub fn running_total(&self) -> u32 {
        self.total
    }

    pub fn finish(self) -> ScoreSummary {
        let mut tags = self.tags;
        if tags.is_empty() {
            tags.insert(CLEAN_TAG.to_string());
        }
        ScoreSummary {
            score: self.total.min(self.cfg.max_score),
            overridden: self.overridden,
            tags,
        }
    }
}

/// Malicious strictly above the threshold, Clean otherwise.
pub fn verdict_for(score: u32, cfg: &ScoringConfig) -> Verdict {
    if score > cfg.malicious_threshold {
        Verdict::Malicious
    } else {
        Verdict::Clean
    }
}

/// Heuristic family label used when no attribution landed.
pub fn family_for(score: u32) -> String {
    format!("Heur.{}", score)
}

/// Actor resolution: attributed name wins; otherwise high scores get the
/// generic high-risk label and everything else stays unknown.
pub fn actor_for(attributed: Option<&str>, score: u32, cfg: &ScoringConfig) -> String {
    match attributed {
        Some(name) => name.to_string(),
        None if score > cfg.high_risk_threshold => HIGH_RISK_ACTOR.to_string(),
        None => UNKNOWN_ACTOR.to_string(),
    }
}

/// attribution_confidence = score * factor. Unclamped by design: 90 at the
/// score ceiling with the default factor, which any future scoring change
/// must keep at or under 100.
pub fn confidence_for(score: u32, cfg: &ScoringConfig) -> u32 {
    score * cfg.confidence_factor
}
