//! Core data types for the scan pipeline.

pub mod artifact;
pub mod finding;
pub mod handle;
pub mod report;

pub use artifact::Artifact;
pub use finding::{AnalyzerKind, Finding, Ioc, IocKind};
pub use handle::ScanHandle;
pub use report::{IndicatorOrigin, Intelligence, NetworkIndicator, Report, Verdict};
