//! Base64 artifact scanning.
//!
//! Locates maximal runs of base64 alphabet characters, decodes them, and
//! keeps the decoded text only when it smells like tooling (URLs, shell
//! invocations). Decode failures are swallowed per candidate; the scan never
//! fails the artifact.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::core::finding::{AnalyzerKind, Finding, IocKind};

/// Candidate runs: 20+ alphabet characters, optionally already padded.
static RE_BASE64_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9+/]{20,}={0,2}").expect("valid base64 run regex"));

const KEYWORDS: &[&str] = &["http", "cmd", "powershell"];

/// Decode every candidate run and keep the texts containing a keyword.
///
/// Candidates are padded to a multiple of four before decoding; decoded bytes
/// become text through lossy UTF-8 so partially-binary payloads still yield
/// their printable parts.
pub fn decode_suspicious_strings(data: &[u8]) -> Vec<String> {
    let mut kept = Vec::new();
    for m in RE_BASE64_RUN.find_iter(data) {
        let mut candidate = m.as_bytes().to_vec();
        let pad = (4 - candidate.len() % 4) % 4;
        candidate.extend(std::iter::repeat(b'=').take(pad));
        let decoded = match STANDARD.decode(&candidate) {
            Ok(d) => d,
            Err(_) => continue,
        };
        let text = String::from_utf8_lossy(&decoded).into_owned();
        if KEYWORDS.iter().any(|k| text.contains(k)) {
            kept.push(text);
        }
    }
    kept
}

/// Findings for the kept decoded strings.
///
/// One `obfuscated-strings` contribution per artifact; per-string extras for
/// embedded URLs and hidden powershell invocations (the powershell check is
/// deliberately case-insensitive where the keep filter above is not).
pub fn analyze(data: &[u8]) -> Vec<Finding> {
    let kept = decode_suspicious_strings(data);
    let mut findings = Vec::new();
    if kept.is_empty() {
        return findings;
    }
    findings.push(Finding::new(AnalyzerKind::Base64, "obfuscated-strings", 2));
    for text in &kept {
        if text.contains("http") {
            findings.push(
                Finding::new(AnalyzerKind::Base64, "decoded-c2-url", 0)
                    .with_ioc(IocKind::Url, text.clone()),
            );
        }
        if text.to_ascii_lowercase().contains("powershell") {
            findings.push(Finding::new(AnalyzerKind::Base64, "hidden-powershell", 3));
        }
    }
    findings
}
