//! Profile analysis workflow: normalize, score, summarize, persist.

pub mod report;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use report::{deterministic_summary, ProfileAnalysis, TopRepositoryView};
pub use router::analysis_router;
pub use service::{AnalysisError, AnalysisOutcome, ComparisonReport, ProfileAnalysisService};
