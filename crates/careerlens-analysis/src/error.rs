use thiserror::Error;

/// Failures inside one analysis attempt. None of these reach the caller of
/// [`crate::AnalysisEngine::analyze`]; they are retried and end in the
/// fallback report.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("assistant API returned HTTP {status}: {body}")]
    Api {
        status: u16,
        body: serde_json::Value,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("run ended with status {status}")]
    RunFailed { status: String },

    #[error("run did not complete after {polls} polls")]
    RunTimeout { polls: u32 },

    #[error("assistant produced no text response")]
    EmptyResponse,
}
