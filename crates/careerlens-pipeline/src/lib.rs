//! Per-request orchestration of profile fetch, analysis and scoring.

pub mod coordinator;
pub mod error;
pub mod report;

pub use coordinator::{ProfileAnalyzer, ProfileSource, RequestCoordinator};
pub use error::PipelineError;
pub use report::{FinalReport, PartialReport, ReportOutcome};
