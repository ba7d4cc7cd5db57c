//! Report payloads returned for one request.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use careerlens_analysis::{AnalysisResult, ScoreSet};
use careerlens_core::ObjectiveTag;
use careerlens_scraper::ProfileSummary;

pub const PARTIAL_NOTE: &str =
    "The automatic analysis failed, but the profile data is still available.";

/// Profile plus analysis plus scores. A fallback analysis still counts.
#[derive(Debug, Clone, Serialize)]
pub struct FinalReport {
    pub profile: ProfileSummary,
    pub objective: ObjectiveTag,
    pub analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_structured: Option<Value>,
    pub is_structured_format: bool,
    /// `true` when `analysis` is the template report rather than assistant
    /// output.
    pub fallback: bool,
    pub scores: ScoreSet,
    pub timestamp: DateTime<Utc>,
    pub partial: bool,
}

impl FinalReport {
    #[must_use]
    pub fn new(profile: ProfileSummary, analysis: AnalysisResult, scores: ScoreSet) -> Self {
        Self {
            profile,
            objective: analysis.objective,
            analysis: analysis.analysis_text,
            analysis_structured: analysis.analysis_structured,
            is_structured_format: analysis.is_structured_format,
            fallback: analysis.fallback,
            scores,
            timestamp: Utc::now(),
            partial: false,
        }
    }
}

/// Profile data without an analysis, returned when the analysis step
/// itself broke.
#[derive(Debug, Clone, Serialize)]
pub struct PartialReport {
    pub profile: ProfileSummary,
    pub objective: ObjectiveTag,
    pub profile_data: Value,
    pub note: &'static str,
    pub note_type: &'static str,
    pub error: String,
    pub timestamp: DateTime<Utc>,
    pub partial: bool,
}

impl PartialReport {
    #[must_use]
    pub fn new(
        profile: ProfileSummary,
        objective: ObjectiveTag,
        profile_data: Value,
        error: String,
    ) -> Self {
        Self {
            profile,
            objective,
            profile_data,
            note: PARTIAL_NOTE,
            note_type: "warning",
            error,
            timestamp: Utc::now(),
            partial: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReportOutcome {
    Complete(FinalReport),
    Partial(PartialReport),
}

impl ReportOutcome {
    #[must_use]
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial(_))
    }
}
