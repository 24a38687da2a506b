//! carcharoth: static-analysis threat assessment for executable artifacts.
//!
//! An artifact (raw bytes plus identity) is handed in turn to each analyzer
//! (entropy estimation, the pattern-rule engine, the base64 decoder, PE import
//! hashing with threat-database attribution, network-indicator extraction)
//! and every finding is folded into one bounded score, a verdict, a
//! deduplicated tag set, and extracted IOCs. The report builder then derives
//! companion YARA and Sigma detection rules from the final tag set.
//!
//! The pipeline never executes the artifact and never talks to a network;
//! the optional host-AV bridge is the only external invocation.
//!
//! ```no_run
//! use carcharoth::{ScanConfig, ScanPipeline, ThreatDatabase};
//!
//! let db = ThreatDatabase::builtin();
//! let pipeline = ScanPipeline::new(ScanConfig::default(), &db);
//! let report = pipeline.scan_file("suspect.exe")?;
//! println!("{:?} {}/10 {}", report.verdict, report.score, report.actor);
//! # Ok::<(), carcharoth::ScanError>(())
//! ```

pub mod aggregate;
pub mod analyzers;
pub mod batch;
pub mod capability;
pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod hashing;
pub mod logging;
pub mod pe;
pub mod pipeline;
pub mod rulegen;
pub mod threatdb;

pub use config::ScanConfig;
pub use core::{Artifact, Finding, Report, ScanHandle, Verdict};
pub use error::{Result, ScanError};
pub use pipeline::ScanPipeline;
pub use threatdb::{ThreatDatabase, ThreatRecord};
