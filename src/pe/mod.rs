//! PE import-hash analysis.
//!
//! Parses the minimum of a PE image needed to enumerate imports, computes the
//! import hash, looks it up in the threat database, and inspects section
//! characteristics. Malformed or non-PE input is non-fatal: the assessment
//! degrades to no findings and an `"N/A"` hash.

pub mod headers;
pub mod imports;
pub mod sections;
pub mod types;
pub mod utils;

use tracing::debug;

use crate::core::finding::{AnalyzerKind, Finding};
use crate::pe::imports::{import_hash, parse_imports, ImportedModule};
use crate::pe::sections::{parse_section_headers, SectionTable};
use crate::pe::types::Result;
use crate::threatdb::{ThreatDatabase, ThreatRecord};

/// Value reported when no import hash could be computed.
pub const IMPHASH_UNAVAILABLE: &str = "N/A";

/// Parsed view of the pieces the analyzer consumes.
struct ParsedPe {
    sections: SectionTable,
    modules: Vec<ImportedModule>,
}

/// Result of PE analysis for one artifact.
#[derive(Debug, Clone)]
pub struct PeAssessment {
    /// Lowercase hex import hash, or [`IMPHASH_UNAVAILABLE`].
    pub imphash: String,
    /// Database record behind a `GENETIC-MATCH` finding, when any.
    pub matched: Option<ThreatRecord>,
    pub findings: Vec<Finding>,
}

impl PeAssessment {
    fn unavailable() -> Self {
        Self {
            imphash: IMPHASH_UNAVAILABLE.to_string(),
            matched: None,
            findings: Vec::new(),
        }
    }
}

fn parse_pe(data: &[u8]) -> Result<ParsedPe> {
    let dos = headers::parse_dos_header(data)?;
    let (coff, optional) = headers::parse_nt_headers(data, dos.e_lfanew as usize)?;
    let section_offset =
        dos.e_lfanew as usize + 24 + coff.size_of_optional_header as usize;
    let sections = parse_section_headers(data, section_offset, coff.number_of_sections);
    let modules = parse_imports(data, &sections, &optional.import_directory, optional.is_64bit)?;
    Ok(ParsedPe { sections, modules })
}

/// Analyze a buffer believed to be a PE image.
///
/// An exact threat-database match is an override finding: it forces the
/// final score to the ceiling no matter what the other analyzers saw.
pub fn analyze(data: &[u8], db: &ThreatDatabase) -> PeAssessment {
    let parsed = match parse_pe(data) {
        Ok(p) => p,
        Err(e) => {
            debug!(error = %e, "not a parseable PE; import analysis skipped");
            return PeAssessment::unavailable();
        }
    };

    let mut assessment = PeAssessment::unavailable();

    if let Some(hash) = import_hash(&parsed.modules) {
        if let Some(record) = db.lookup(&hash) {
            assessment.findings.push(
                Finding::new(
                    AnalyzerKind::PeImports,
                    format!("GENETIC-MATCH:{}", record.category),
                    0,
                )
                .with_override(),
            );
            assessment.matched = Some(record.clone());
        }
        assessment.imphash = hash;
    }

    for section in parsed.sections.rwx_sections() {
        debug!(section = %section.name(), "writable+executable code section");
        assessment
            .findings
            .push(Finding::new(AnalyzerKind::PeImports, "RWX-Section(Injection)", 4));
    }

    assessment
}
