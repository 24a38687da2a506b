//! The scan pipeline.
//!
//! Hands the artifact to each analyzer in a fixed order and folds their
//! findings into one report. The pipeline is synchronous and keeps no state
//! between artifacts; the only blocking call is the single AV-bridge
//! subprocess invocation, and the only shared inputs are the immutable
//! configuration and threat database.

use std::path::Path;

use chrono::Utc;
use tracing::{debug, info};

use crate::aggregate::{self, ScoreFold};
use crate::analyzers::{base64scan, entropy, intel, network, signatures};
use crate::capability::{AvBridge, BuiltinRuleEngine, NoOpAvBridge, RuleEngine};
use crate::config::ScanConfig;
use crate::core::artifact::Artifact;
use crate::core::finding::{AnalyzerKind, Finding, IocKind};
use crate::core::report::{Intelligence, Report};
use crate::error::Result;
use crate::pe;
use crate::threatdb::ThreatDatabase;

/// One configured scan pipeline.
///
/// The threat database is borrowed: it is process-wide immutable
/// configuration owned by the caller, and many pipelines (or batch workers)
/// may share it.
pub struct ScanPipeline<'db> {
    config: ScanConfig,
    db: &'db ThreatDatabase,
    av: Box<dyn AvBridge>,
    rules: Box<dyn RuleEngine>,
}

impl<'db> ScanPipeline<'db> {
    /// Pipeline with default capabilities: no AV bridge, built-in rules.
    pub fn new(config: ScanConfig, db: &'db ThreatDatabase) -> Self {
        Self {
            config,
            db,
            av: Box::new(NoOpAvBridge),
            rules: Box::new(BuiltinRuleEngine),
        }
    }

    /// Substitute an AV bridge capability.
    pub fn with_av_bridge(mut self, av: Box<dyn AvBridge>) -> Self {
        self.av = av;
        self
    }

    /// Substitute a rule-engine capability.
    pub fn with_rule_engine(mut self, rules: Box<dyn RuleEngine>) -> Self {
        self.rules = rules;
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Load and scan a file. Only load failures surface as errors; analyzer
    /// trouble degrades to zero findings inside [`Self::scan_artifact`].
    pub fn scan_file<P: AsRef<Path>>(&self, path: P) -> Result<Report> {
        let artifact = Artifact::from_path(path, &self.config.io)?;
        Ok(self.scan_artifact(&artifact))
    }

    /// Scan an in-memory buffer.
    pub fn scan_bytes(&self, data: Vec<u8>, label: &str) -> Report {
        let artifact = Artifact::from_bytes(data, label);
        self.scan_artifact(&artifact)
    }

    /// Run every analyzer over the artifact and aggregate the findings.
    ///
    /// Fixed order: AV bridge, rule engine, base64, entropy, PE imports,
    /// network extraction, literal table. Infallible by construction: a
    /// report always comes back, never a partial one.
    pub fn scan_artifact(&self, artifact: &Artifact) -> Report {
        let span = tracing::info_span!(
            "scan",
            path = %artifact.path().display(),
            md5 = %artifact.md5(),
            size_bytes = artifact.len()
        );
        let _guard = span.enter();
        info!("start");
        let data = artifact.data();
        let mut findings: Vec<Finding> = Vec::new();

        // 1. External AV bridge (overrides on a hit)
        if self.av.is_available() {
            debug!(phase = "av-bridge", "querying host scanner");
            if let Some(label) = self.av.scan(artifact.path()) {
                if label.to_ascii_lowercase().contains("trojan") {
                    findings.push(Finding::new(AnalyzerKind::AvBridge, "trojan", 0));
                }
                findings.push(
                    Finding::new(AnalyzerKind::AvBridge, format!("AV-HIT:{}", label), 0)
                        .with_override(),
                );
            }
        }

        // 2. Rule engine
        debug!(phase = "signatures", "rule evaluation");
        for name in self.rules.scan(data) {
            findings.push(Finding::new(
                AnalyzerKind::Signatures,
                format!("YARA:{}", name),
                self.config.signatures.rule_score,
            ));
        }

        // 3. Base64 artifacts
        debug!(phase = "base64", "run extraction");
        findings.extend(base64scan::analyze(data));

        // 4. Entropy
        let overall = entropy::shannon_entropy(data);
        debug!(phase = "entropy", entropy = overall);
        if overall > self.config.entropy.packed_threshold {
            findings.push(Finding::new(
                AnalyzerKind::Entropy,
                "packed (high-entropy)",
                self.config.entropy.packed_score,
            ));
        }

        // 5. PE imports and section characteristics
        debug!(phase = "pe", "import hash analysis");
        let pe_assessment = pe::analyze(data, self.db);
        findings.extend(pe_assessment.findings.iter().cloned());

        let mut fold = ScoreFold::new(&self.config.scoring);
        fold.apply_all(&findings);

        // 6. Network indicators; the placeholder policy reads the running
        // total accumulated so far
        debug!(phase = "network", "indicator extraction");
        let mut indicators =
            network::extract_indicators(data, self.config.network.max_indicators);
        if indicators.is_empty()
            && fold.running_total() > self.config.network.placeholder_threshold
        {
            indicators.push(network::placeholder_indicator());
        }

        // 7. Literal tag table, deduplicated at match time
        debug!(phase = "literals", "tag table sweep");
        let literal_findings: Vec<Finding> = signatures::match_literal_tags(data)
            .into_iter()
            .map(|tag| {
                Finding::new(
                    AnalyzerKind::Signatures,
                    tag,
                    self.config.signatures.literal_score,
                )
            })
            .collect();
        fold.apply_all(&literal_findings);
        findings.extend(literal_findings);

        let intelligence = collect_intelligence(&findings, data);
        let summary = fold.finish();
        let scoring = &self.config.scoring;
        let actor = aggregate::actor_for(
            pe_assessment.matched.as_ref().map(|r| r.actor_name.as_str()),
            summary.score,
            scoring,
        );

        let report = Report {
            score: summary.score,
            verdict: aggregate::verdict_for(summary.score, scoring),
            family: aggregate::family_for(summary.score),
            tags: summary.tags,
            import_hash: pe_assessment.imphash,
            attribution_confidence: aggregate::confidence_for(summary.score, scoring),
            actor,
            network: indicators,
            intelligence,
            md5: artifact.md5().to_string(),
            scanned_at: Utc::now(),
        };
        info!(score = report.score, verdict = ?report.verdict, "complete");
        report
    }
}

/// Merge analyzer IOCs and the supplemental sweep into report intelligence.
fn collect_intelligence(findings: &[Finding], data: &[u8]) -> Intelligence {
    let mut out = Intelligence::default();
    for ioc in findings.iter().filter_map(|f| f.ioc.as_ref()) {
        match ioc.kind {
            IocKind::Url if !out.urls.contains(&ioc.value) => out.urls.push(ioc.value.clone()),
            _ => {}
        }
    }
    for ioc in intel::sweep(data) {
        match ioc.kind {
            IocKind::Email => out.emails.push(ioc.value),
            IocKind::Wallet => out.wallets.push(ioc.value),
            IocKind::Url if !out.urls.contains(&ioc.value) => out.urls.push(ioc.value),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::Verdict;
    use std::path::Path;

    struct FlaggingBridge;

    impl AvBridge for FlaggingBridge {
        fn is_available(&self) -> bool {
            true
        }

        fn scan(&self, _path: &Path) -> Option<String> {
            Some("Trojan:Win32/Test".to_string())
        }
    }

    #[test]
    fn test_av_hit_overrides_score() {
        let db = ThreatDatabase::builtin();
        let pipeline = ScanPipeline::new(ScanConfig::default(), &db)
            .with_av_bridge(Box::new(FlaggingBridge));
        let report = pipeline.scan_bytes(b"completely boring bytes".to_vec(), "mem");
        assert_eq!(report.score, 10);
        assert_eq!(report.verdict, Verdict::Malicious);
        assert!(report.tags.contains("AV-HIT:Trojan:Win32/Test"));
        assert!(report.tags.contains("trojan"));
    }

    #[test]
    fn test_default_bridge_contributes_nothing() {
        let db = ThreatDatabase::builtin();
        let pipeline = ScanPipeline::new(ScanConfig::default(), &db);
        let report = pipeline.scan_bytes(b"completely boring bytes".to_vec(), "mem");
        assert_eq!(report.score, 0);
        assert!(report.is_unremarkable());
    }

    #[test]
    fn test_literal_and_rule_scores_stack() {
        let db = ThreatDatabase::builtin();
        let pipeline = ScanPipeline::new(ScanConfig::default(), &db);
        // Rule Suspicious_Powershell (+4) plus literal powershell-exec (+3)
        let report = pipeline.scan_bytes(b"powershell -enc SQBFAFgA".to_vec(), "mem");
        assert!(report.tags.contains("YARA:Suspicious_Powershell"));
        assert!(report.tags.contains("powershell-exec"));
        assert_eq!(report.score, 7);
        assert_eq!(report.verdict, Verdict::Malicious);
    }
}
