//! Companion detection-rule generation.
//!
//! Pure template rendering over a finished report: the tag set is inverted
//! back into byte literals and expressed once in the YARA grammar and once as
//! a Sigma log-correlation document. Both outputs are consumed by external
//! security tooling, so grammatical validity matters more than cleverness.

use chrono::Utc;
use uuid::Uuid;

use crate::core::report::{Report, Verdict};

/// Tags that map back to a searchable byte literal.
const TAG_LITERALS: &[(&str, &str)] = &[
    ("powershell-exec", "powershell"),
    ("cmd-exec", "cmd.exe"),
    ("file-download", "bitsadmin"),
    ("reconnaissance", "whoami"),
    ("credential-dumping", "mimikatz"),
    ("ransomware-behavior", "vssadmin"),
    ("hidden-powershell", "powershell"),
];

fn derived_literals(report: &Report) -> Vec<&'static str> {
    let mut literals = Vec::new();
    for (tag, literal) in TAG_LITERALS {
        if report.tags.contains(*tag) && !literals.contains(literal) {
            literals.push(*literal);
        }
    }
    literals
}

fn rule_suffix(report: &Report) -> &str {
    report.md5.get(..8).unwrap_or("unknown")
}

/// Render a YARA rule covering the artifact's observed literals.
///
/// Falls back to an MD5 hash condition when no tag maps to a literal, so the
/// emitted rule always has a well-formed condition.
pub fn generate_yara_rule(report: &Report) -> String {
    let literals = derived_literals(report);
    let date = Utc::now().format("%Y-%m-%d");
    let mut out = String::new();

    if literals.is_empty() {
        out.push_str("import \"hash\"\n\n");
    }
    out.push_str(&format!("rule Carcharoth_AutoGen_{}\n{{\n", rule_suffix(report)));
    out.push_str("    meta:\n");
    out.push_str("        author = \"carcharoth\"\n");
    out.push_str(&format!("        date = \"{}\"\n", date));
    out.push_str(&format!("        family = \"{}\"\n", report.family));
    out.push_str(&format!("        score = {}\n", report.score));

    if literals.is_empty() {
        out.push_str("    condition:\n");
        out.push_str(&format!(
            "        hash.md5(0, filesize) == \"{}\"\n",
            report.md5
        ));
    } else {
        out.push_str("    strings:\n");
        for (i, literal) in literals.iter().enumerate() {
            out.push_str(&format!("        $s{} = \"{}\" nocase\n", i, literal));
        }
        out.push_str("    condition:\n");
        out.push_str("        any of them\n");
    }
    out.push_str("}\n");
    out
}

/// Render a Sigma process-creation rule expressing the same literals.
pub fn generate_sigma_rule(report: &Report) -> String {
    let literals = derived_literals(report);
    let date = Utc::now().format("%Y/%m/%d");
    let level = match report.verdict {
        Verdict::Malicious => "high",
        Verdict::Clean => "low",
    };

    let mut out = String::new();
    out.push_str(&format!(
        "title: Carcharoth Auto Detection {}\n",
        rule_suffix(report)
    ));
    out.push_str(&format!("id: {}\n", Uuid::new_v4()));
    out.push_str("status: experimental\n");
    out.push_str(&format!(
        "description: Auto-generated correlation rule for artifact {}\n",
        report.md5
    ));
    out.push_str("author: carcharoth\n");
    out.push_str(&format!("date: {}\n", date));
    out.push_str("logsource:\n");
    out.push_str("    category: process_creation\n");
    out.push_str("    product: windows\n");
    out.push_str("detection:\n");
    out.push_str("    selection:\n");
    if literals.is_empty() {
        out.push_str(&format!("        Hashes|contains: 'MD5={}'\n", report.md5));
    } else {
        out.push_str("        CommandLine|contains:\n");
        for literal in &literals {
            out.push_str(&format!("            - '{}'\n", literal));
        }
    }
    out.push_str("    condition: selection\n");
    out.push_str("falsepositives:\n");
    out.push_str("    - Unknown\n");
    out.push_str(&format!("level: {}\n", level));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::Intelligence;
    use chrono::Utc;

    fn report_with_tags(tags: &[&str], verdict: Verdict) -> Report {
        Report {
            score: if verdict == Verdict::Malicious { 9 } else { 0 },
            verdict,
            family: "Heur.9".into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            import_hash: "N/A".into(),
            attribution_confidence: 81,
            actor: "Unknown".into(),
            network: Vec::new(),
            intelligence: Intelligence::default(),
            md5: "900150983cd24fb0d6963f7d28e17f72".into(),
            scanned_at: Utc::now(),
        }
    }

    #[test]
    fn test_yara_rule_with_literals() {
        let r = report_with_tags(&["powershell-exec", "ransomware-behavior"], Verdict::Malicious);
        let text = generate_yara_rule(&r);
        assert!(text.starts_with("rule Carcharoth_AutoGen_90015098"));
        assert!(text.contains("$s0 = \"powershell\" nocase"));
        assert!(text.contains("$s1 = \"vssadmin\" nocase"));
        assert!(text.contains("any of them"));
        // Braces balance
        assert_eq!(text.matches('{').count(), text.matches('}').count());
    }

    #[test]
    fn test_yara_rule_hash_fallback() {
        let r = report_with_tags(&["clean"], Verdict::Clean);
        let text = generate_yara_rule(&r);
        assert!(text.starts_with("import \"hash\""));
        assert!(text.contains("hash.md5(0, filesize) == \"900150983cd24fb0d6963f7d28e17f72\""));
        assert!(!text.contains("strings:"));
    }

    #[test]
    fn test_yara_dedupes_shared_literals() {
        let r = report_with_tags(&["powershell-exec", "hidden-powershell"], Verdict::Malicious);
        let text = generate_yara_rule(&r);
        assert_eq!(text.matches("\"powershell\"").count(), 1);
    }

    #[test]
    fn test_sigma_rule_shape() {
        let r = report_with_tags(&["cmd-exec"], Verdict::Malicious);
        let text = generate_sigma_rule(&r);
        assert!(text.starts_with("title: Carcharoth Auto Detection"));
        assert!(text.contains("logsource:\n    category: process_creation"));
        assert!(text.contains("CommandLine|contains:\n            - 'cmd.exe'"));
        assert!(text.contains("condition: selection"));
        assert!(text.ends_with("level: high\n"));
    }

    #[test]
    fn test_sigma_clean_falls_back_to_hash_selection() {
        let r = report_with_tags(&["clean"], Verdict::Clean);
        let text = generate_sigma_rule(&r);
        assert!(text.contains("Hashes|contains: 'MD5=900150983cd24fb0d6963f7d28e17f72'"));
        assert!(text.ends_with("level: low\n"));
    }

    #[test]
    fn test_literal_order_follows_table() {
        let r = report_with_tags(&["ransomware-behavior", "powershell-exec"], Verdict::Malicious);
        let text = generate_yara_rule(&r);
        let ps = text.find("powershell").unwrap();
        let vss = text.find("vssadmin").unwrap();
        assert!(ps < vss);
    }
}
