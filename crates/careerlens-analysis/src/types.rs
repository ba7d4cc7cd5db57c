use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use careerlens_core::ObjectiveTag;

/// Outcome of one analysis, from the assistant or from the fallback template.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub success: bool,
    pub analysis_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_structured: Option<Value>,
    pub is_structured_format: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    pub objective: ObjectiveTag,
    pub timestamp: DateTime<Utc>,
    /// `true` when the text is the synthesized fallback report.
    pub fallback: bool,
}

impl AnalysisResult {
    /// Wraps assistant output, keeping the parsed object when the text is a
    /// JSON object.
    #[must_use]
    pub fn from_assistant(
        text: String,
        conversation_id: String,
        run_id: String,
        objective: ObjectiveTag,
    ) -> Self {
        let analysis_structured = parse_structured(&text);
        Self {
            success: true,
            is_structured_format: analysis_structured.is_some(),
            analysis_structured,
            analysis_text: text,
            conversation_id: Some(conversation_id),
            run_id: Some(run_id),
            objective,
            timestamp: Utc::now(),
            fallback: false,
        }
    }

    #[must_use]
    pub fn fallback(text: String, objective: ObjectiveTag) -> Self {
        Self {
            success: true,
            analysis_text: text,
            analysis_structured: None,
            is_structured_format: false,
            conversation_id: None,
            run_id: None,
            objective,
            timestamp: Utc::now(),
            fallback: true,
        }
    }
}

/// Strict parse: only a JSON object counts as structured output.
fn parse_structured(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text.trim())
        .ok()
        .filter(Value::is_object)
}
