use careerlens_analysis::AnalysisError;
use careerlens_scraper::ScraperError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or unusable request input. Never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// The profile could not be fetched; nothing can be reported.
    #[error("profile fetch failed: {0}")]
    ProfileFetch(#[source] ScraperError),

    #[error("request did not finish within {secs}s")]
    Timeout { secs: u64 },

    #[error("scraper setup failed: {0}")]
    ScraperSetup(#[source] ScraperError),

    #[error("analysis setup failed: {0}")]
    AnalysisSetup(#[source] AnalysisError),
}
