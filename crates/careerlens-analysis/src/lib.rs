//! Profile analysis through an LLM assistant, with a template fallback, and
//! score extraction from the assistant's output.

pub mod assistant;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod polling;
pub mod prompt;
pub mod scores;
pub mod types;

pub use engine::{AnalysisConfig, AnalysisEngine};
pub use error::AnalysisError;
pub use fallback::fallback_report;
pub use polling::{PollStep, RunPoll};
pub use prompt::build_prompt;
pub use scores::{extract_scores, ScoreSet};
pub use types::AnalysisResult;
