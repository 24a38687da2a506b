//! Declarative byte-pattern rules and the literal tag table.
//!
//! Two independent mechanisms, both pure functions of the buffer:
//!
//! 1. A small rule engine: each rule is a set of string literals with
//!    matching flags (`nocase`, `wide` = UTF-16LE) and a condition over how
//!    many of them must be present. Rules are data, evaluated by one generic
//!    interpreter, so the embedded library below can grow without new code.
//! 2. A flat literal-to-tag table searched case-insensitively in a single
//!    pass; each tag fires at most once per artifact.
//!
//! Case folding is ASCII-only, which is what the literals in scope need.

use aho_corasick::AhoCorasick;
use memchr::memmem;
use once_cell::sync::Lazy;

/// A single string literal with matching flags.
#[derive(Debug, Clone)]
pub struct StringPattern {
    literal: String,
    nocase: bool,
    wide: bool,
}

impl StringPattern {
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
            nocase: false,
            wide: false,
        }
    }

    /// Match case-insensitively (ASCII folding).
    pub fn nocase(mut self) -> Self {
        self.nocase = true;
        self
    }

    /// Match the UTF-16LE encoding of the literal.
    pub fn wide(mut self) -> Self {
        self.wide = true;
        self
    }

    /// The concrete byte needle this pattern searches for.
    fn needle(&self) -> Vec<u8> {
        let literal = if self.nocase {
            self.literal.to_ascii_lowercase()
        } else {
            self.literal.clone()
        };
        if self.wide {
            literal
                .encode_utf16()
                .flat_map(u16::to_le_bytes)
                .collect()
        } else {
            literal.into_bytes()
        }
    }

    /// Presence test against the raw buffer and its ASCII-lowercased copy.
    fn is_present(&self, raw: &[u8], lowered: &[u8]) -> bool {
        let haystack = if self.nocase { lowered } else { raw };
        memmem::find(haystack, &self.needle()).is_some()
    }
}

/// How many of a rule's patterns must be present for the rule to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    AnyOf,
    AllOf,
    AtLeastN(usize),
}

impl Condition {
    fn satisfied(&self, hits: usize, total: usize) -> bool {
        match self {
            Self::AnyOf => hits >= 1,
            Self::AllOf => total > 0 && hits == total,
            Self::AtLeastN(n) => hits >= *n,
        }
    }
}

/// A named detection rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub patterns: Vec<StringPattern>,
    pub condition: Condition,
}

impl Rule {
    pub fn new(name: impl Into<String>, patterns: Vec<StringPattern>, condition: Condition) -> Self {
        Self {
            name: name.into(),
            patterns,
            condition,
        }
    }

    fn matches(&self, raw: &[u8], lowered: &[u8]) -> bool {
        let hits = self
            .patterns
            .iter()
            .filter(|p| p.is_present(raw, lowered))
            .count();
        self.condition.satisfied(hits, self.patterns.len())
    }
}

/// An ordered collection of rules evaluated together.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Names of all rules whose condition holds over the buffer.
    ///
    /// Never fails; an empty buffer simply matches nothing. The lowercased
    /// copy is built once and shared across every nocase pattern.
    pub fn evaluate(&self, data: &[u8]) -> Vec<&str> {
        if self.rules.is_empty() {
            return Vec::new();
        }
        let lowered = data.to_ascii_lowercase();
        self.rules
            .iter()
            .filter(|r| r.matches(data, &lowered))
            .map(|r| r.name.as_str())
            .collect()
    }
}

/// The embedded rule library, process-wide and immutable.
pub static BUILTIN_RULES: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::new(
            "Suspicious_Powershell",
            vec![
                StringPattern::new("powershell").nocase(),
                StringPattern::new("-enc").nocase(),
            ],
            Condition::AtLeastN(2),
        ),
        Rule::new(
            "Anti_Analysis",
            vec![
                StringPattern::new("IsDebuggerPresent"),
                StringPattern::new("SbieDll.dll"),
            ],
            Condition::AnyOf,
        ),
        Rule::new(
            "Ransomware",
            vec![
                StringPattern::new("vssadmin delete").nocase(),
                StringPattern::new(".lock").wide(),
            ],
            Condition::AnyOf,
        ),
    ])
});

/// Raw byte pattern to behavioral tag, searched case-insensitively.
pub const LITERAL_TAGS: &[(&str, &str)] = &[
    ("powershell", "powershell-exec"),
    ("cmd.exe", "cmd-exec"),
    ("bitsadmin", "file-download"),
    ("whoami", "reconnaissance"),
    ("mimikatz", "credential-dumping"),
    ("vssadmin", "ransomware-behavior"),
];

static LITERAL_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(LITERAL_TAGS.iter().map(|(pattern, _)| *pattern))
        .expect("valid literal patterns")
});

/// Tags from the literal table present in the buffer, deduplicated at match
/// time and ordered by first occurrence.
pub fn match_literal_tags(data: &[u8]) -> Vec<&'static str> {
    let mut seen = [false; LITERAL_TAGS.len()];
    let mut tags = Vec::new();
    for m in LITERAL_MATCHER.find_iter(data) {
        let idx = m.pattern().as_usize();
        if !seen[idx] {
            seen[idx] = true;
            tags.push(LITERAL_TAGS[idx].1);
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nocase_pattern() {
        let p = StringPattern::new("PowerShell").nocase();
        let data = b"..POWERSHELL..";
        assert!(p.is_present(data, &data.to_ascii_lowercase()));
        let data = b"nothing here";
        assert!(!p.is_present(data, &data.to_ascii_lowercase()));
    }

    #[test]
    fn test_wide_pattern_matches_utf16le() {
        let p = StringPattern::new(".lock").wide();
        let wide: Vec<u8> = ".lock".encode_utf16().flat_map(u16::to_le_bytes).collect();
        let mut data = b"prefix\x00".to_vec();
        data.extend_from_slice(&wide);
        assert!(p.is_present(&data, &data.to_ascii_lowercase()));
        // The narrow encoding must not satisfy a wide pattern.
        let narrow = b"file.lock";
        assert!(!p.is_present(narrow, &narrow.to_ascii_lowercase()));
    }

    #[test]
    fn test_condition_kinds() {
        assert!(Condition::AnyOf.satisfied(1, 3));
        assert!(!Condition::AnyOf.satisfied(0, 3));
        assert!(Condition::AllOf.satisfied(3, 3));
        assert!(!Condition::AllOf.satisfied(2, 3));
        assert!(Condition::AtLeastN(2).satisfied(2, 3));
        assert!(!Condition::AtLeastN(2).satisfied(1, 3));
    }

    #[test]
    fn test_builtin_two_of_them() {
        // Both literals present, any case
        let hits = BUILTIN_RULES.evaluate(b"run POWERSHELL -EnC SQBFAFgA");
        assert!(hits.contains(&"Suspicious_Powershell"));
        // Only one of the two present
        let hits = BUILTIN_RULES.evaluate(b"powershell alone");
        assert!(!hits.contains(&"Suspicious_Powershell"));
    }

    #[test]
    fn test_builtin_any_of_case_sensitive() {
        let hits = BUILTIN_RULES.evaluate(b"calls IsDebuggerPresent then exits");
        assert!(hits.contains(&"Anti_Analysis"));
        // Anti_Analysis literals carry no nocase flag
        let hits = BUILTIN_RULES.evaluate(b"isdebuggerpresent");
        assert!(!hits.contains(&"Anti_Analysis"));
    }

    #[test]
    fn test_empty_buffer_matches_nothing() {
        assert!(BUILTIN_RULES.evaluate(b"").is_empty());
        assert!(match_literal_tags(b"").is_empty());
    }

    #[test]
    fn test_literal_tags_dedup_at_match_time() {
        let tags = match_literal_tags(b"whoami; whoami; WHOAMI");
        assert_eq!(tags, vec!["reconnaissance"]);
    }

    #[test]
    fn test_literal_tags_ordered_by_occurrence() {
        let tags = match_literal_tags(b"mimikatz then cmd.exe then powershell");
        assert_eq!(
            tags,
            vec!["credential-dumping", "cmd-exec", "powershell-exec"]
        );
    }
}
