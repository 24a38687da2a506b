//! Optional host capabilities.
//!
//! External dependencies the pipeline can use but never requires. Each is a
//! trait with an explicit available/unavailable state, injected at pipeline
//! construction; the default implementations make absence a non-event rather
//! than a silent global flag.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::analyzers::signatures::BUILTIN_RULES;

/// Bridge to a host antivirus scanner.
///
/// `scan` returns the scanner's detection label when it flags the file;
/// `None` means either "clean" or "nothing to ask"; callers must gate on
/// [`AvBridge::is_available`] to tell the two apart.
pub trait AvBridge: Send + Sync {
    fn is_available(&self) -> bool;
    fn scan(&self, path: &Path) -> Option<String>;
}

/// The default bridge: no scanner on this host.
#[derive(Debug, Default)]
pub struct NoOpAvBridge;

impl AvBridge for NoOpAvBridge {
    fn is_available(&self) -> bool {
        false
    }

    fn scan(&self, _path: &Path) -> Option<String> {
        None
    }
}

const DEFENDER_CANDIDATES: &[&str] = &[
    r"C:\Program Files\Windows Defender\MpCmdRun.exe",
    r"C:\Program Files (x86)\Windows Defender\MpCmdRun.exe",
];

/// Windows Defender command-line bridge.
///
/// One bounded subprocess invocation per scan; the textual result is
/// consumed, nothing else of the scanner is reimplemented.
#[derive(Debug)]
pub struct DefenderBridge {
    binary: Option<PathBuf>,
}

impl DefenderBridge {
    /// Probe the standard install locations.
    pub fn locate() -> Self {
        let binary = DEFENDER_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists());
        if binary.is_none() {
            debug!("MpCmdRun.exe not present; AV bridge unavailable");
        }
        Self { binary }
    }

    /// Use a specific scanner binary (tests, nonstandard installs).
    pub fn with_binary(binary: PathBuf) -> Self {
        Self {
            binary: Some(binary),
        }
    }
}

impl AvBridge for DefenderBridge {
    fn is_available(&self) -> bool {
        self.binary.is_some()
    }

    fn scan(&self, path: &Path) -> Option<String> {
        let binary = self.binary.as_ref()?;
        let output = Command::new(binary)
            .args(["-Scan", "-ScanType", "3", "-File"])
            .arg(path)
            .arg("-DisableRemediation")
            .output();
        match output {
            Ok(out) => {
                let stdout = String::from_utf8_lossy(&out.stdout);
                if stdout.contains("Threat detected") {
                    Some("Generic.Malware (Defender)".to_string())
                } else {
                    None
                }
            }
            Err(e) => {
                warn!(error = %e, "AV bridge invocation failed; continuing without it");
                None
            }
        }
    }
}

/// Pattern-rule evaluation capability.
///
/// The built-in engine always satisfies this; a host with a full third-party
/// matcher can substitute it without changing the finding contract, since
/// only matched rule names cross the boundary.
pub trait RuleEngine: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }

    /// Names of the rules matching the buffer.
    fn scan(&self, data: &[u8]) -> Vec<String>;
}

/// The embedded rule engine over the built-in rule library.
#[derive(Debug, Default)]
pub struct BuiltinRuleEngine;

impl RuleEngine for BuiltinRuleEngine {
    fn scan(&self, data: &[u8]) -> Vec<String> {
        BUILTIN_RULES
            .evaluate(data)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_bridge_unavailable() {
        let bridge = NoOpAvBridge;
        assert!(!bridge.is_available());
        assert_eq!(bridge.scan(Path::new("/tmp/x")), None);
    }

    #[test]
    fn test_defender_locate_degrades_off_windows() {
        let bridge = DefenderBridge::locate();
        // On any host without the binary this is simply unavailable.
        if !Path::new(DEFENDER_CANDIDATES[0]).exists()
            && !Path::new(DEFENDER_CANDIDATES[1]).exists()
        {
            assert!(!bridge.is_available());
        }
    }

    #[test]
    fn test_builtin_engine_reports_rule_names() {
        let engine = BuiltinRuleEngine;
        assert!(engine.is_available());
        let hits = engine.scan(b"powershell -enc SQBFAFgA");
        assert_eq!(hits, vec!["Suspicious_Powershell".to_string()]);
        assert!(engine.scan(b"").is_empty());
    }
}
