//! End-to-end pipeline scenarios.

mod common;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use carcharoth::core::report::IndicatorOrigin;
use carcharoth::rulegen::{generate_sigma_rule, generate_yara_rule};
use carcharoth::threatdb::{ThreatDatabase, ThreatRecord};
use carcharoth::{ScanConfig, ScanPipeline, Verdict};
use common::{build_import_pe, IDATA_FLAGS};

fn pipeline(db: &ThreatDatabase) -> ScanPipeline<'_> {
    ScanPipeline::new(ScanConfig::default(), db)
}

#[test]
fn scenario_repeated_byte_buffer_is_clean() {
    let db = ThreatDatabase::builtin();
    let report = pipeline(&db).scan_bytes(vec![0x41u8; 10_000], "repeated.bin");

    assert_eq!(report.score, 0);
    assert_eq!(report.verdict, Verdict::Clean);
    assert_eq!(report.tags.len(), 1);
    assert!(report.tags.contains("clean"));
    assert_eq!(report.import_hash, "N/A");
    assert_eq!(report.actor, "Unknown");
    assert_eq!(report.attribution_confidence, 0);
    assert!(report.network.is_empty());
}

#[test]
fn scenario_database_match_attributes_regardless_of_other_findings() {
    let image = build_import_pe(IDATA_FLAGS, &[]);
    let db = ThreatDatabase::builtin();
    let imphash = pipeline(&db)
        .scan_bytes(image.clone(), "probe.exe")
        .import_hash;
    assert_ne!(imphash, "N/A");

    let db = ThreatDatabase::from_records([(
        imphash.clone(),
        ThreatRecord {
            actor_name: "Kimsuky".into(),
            category: "Espionage".into(),
        },
    )]);
    let report = pipeline(&db).scan_bytes(image, "probe.exe");

    assert_eq!(report.score, 10);
    assert_eq!(report.verdict, Verdict::Malicious);
    assert_eq!(report.actor, "Kimsuky");
    assert_eq!(report.import_hash, imphash);
    assert!(report.tags.iter().any(|t| t.starts_with("GENETIC-MATCH:")));
    assert_eq!(report.attribution_confidence, 90);
    assert_eq!(report.family, "Heur.10");
}

#[test]
fn scenario_literal_and_hidden_powershell_stack() {
    // A visible powershell string plus a base64 run decoding to one
    let mut buf = b"launch PowerShell now ".to_vec();
    buf.extend_from_slice(STANDARD.encode("powershell -nop -w hidden -c calc").as_bytes());
    let db = ThreatDatabase::builtin();
    let report = pipeline(&db).scan_bytes(buf, "dropper.ps1");

    assert!(report.tags.contains("powershell-exec"));
    assert!(report.tags.contains("hidden-powershell"));
    assert!(report.tags.contains("obfuscated-strings"));
    // +3 literal, +3 hidden powershell, +2 obfuscated strings
    assert!(report.score >= 6);
}

#[test]
fn score_is_always_bounded_and_verdict_consistent() {
    // Pile every cheap signal into one buffer to push the raw total past 10
    let mut buf = Vec::new();
    buf.extend_from_slice(b"powershell -enc SQBFAFgA cmd.exe bitsadmin whoami mimikatz ");
    buf.extend_from_slice(b"vssadmin delete shadows IsDebuggerPresent ");
    buf.extend_from_slice(STANDARD.encode("powershell http://c2.example/x").as_bytes());

    let db = ThreatDatabase::builtin();
    let report = pipeline(&db).scan_bytes(buf, "kitchen-sink.bin");

    assert!(report.score <= 10);
    assert_eq!(report.score, 10);
    assert_eq!(report.verdict, Verdict::Malicious);
    // Every tag appears exactly once however many analyzers produced it
    let as_vec: Vec<_> = report.tags.iter().collect();
    let mut deduped = as_vec.clone();
    deduped.dedup();
    assert_eq!(as_vec, deduped);
    assert_eq!(report.actor, "High-Risk Threat Actor");
}

#[test]
fn observed_indicators_win_over_placeholder() {
    let db = ThreatDatabase::builtin();
    let mut buf = b"connects to 45.77.1.9 for staging; ".to_vec();
    buf.extend_from_slice(b"powershell -enc AAAA cmd.exe mimikatz vssadmin whoami bitsadmin");
    let report = pipeline(&db).scan_bytes(buf, "beacon.bin");

    assert!(report.score > 8);
    assert_eq!(report.network.len(), 1);
    assert_eq!(report.network[0].ip, "45.77.1.9");
    assert_eq!(report.network[0].origin, IndicatorOrigin::Observed);
}

#[test]
fn placeholder_indicator_appears_only_under_high_suspicion() {
    let db = ThreatDatabase::builtin();

    // All three rules fire before the network step runs, so the running
    // total is already past the threshold when extraction comes up empty
    let buf = b"powershell -enc AAAA IsDebuggerPresent vssadmin delete shadows".to_vec();
    let report = pipeline(&db).scan_bytes(buf, "quiet.bin");
    assert!(report.score > 8);
    assert_eq!(report.network.len(), 1);
    assert_eq!(report.network[0].ip, "103.20.10.5");
    assert_eq!(report.network[0].proto, "Hidden");
    assert_eq!(report.network[0].origin, IndicatorOrigin::Synthetic);

    // Low score, no address: nothing is fabricated
    let report = pipeline(&db).scan_bytes(b"whoami".to_vec(), "lowkey.bin");
    assert!(report.score <= 8);
    assert!(report.network.is_empty());
}

#[test]
fn generated_rules_cover_the_final_tags() {
    let db = ThreatDatabase::builtin();
    let report = pipeline(&db).scan_bytes(b"cmd.exe and mimikatz together".to_vec(), "pair.bin");

    let yara = generate_yara_rule(&report);
    assert!(yara.contains("rule Carcharoth_AutoGen_"));
    assert!(yara.contains("\"cmd.exe\" nocase"));
    assert!(yara.contains("\"mimikatz\" nocase"));
    assert!(yara.contains("condition:"));

    let sigma = generate_sigma_rule(&report);
    assert!(sigma.contains("title: Carcharoth Auto Detection"));
    assert!(sigma.contains("- 'cmd.exe'"));
    assert!(sigma.contains("- 'mimikatz'"));
    assert!(sigma.contains("condition: selection"));
}

#[test]
fn decoded_urls_populate_intelligence() {
    let mut buf = b"prefix ".to_vec();
    buf.extend_from_slice(STANDARD.encode("GET http://c2.example/stage2").as_bytes());
    let db = ThreatDatabase::builtin();
    let report = pipeline(&db).scan_bytes(buf, "stager.bin");

    assert!(report.tags.contains("decoded-c2-url"));
    assert_eq!(report.intelligence.urls.len(), 1);
    assert!(report.intelligence.urls[0].contains("http://c2.example/stage2"));
}
