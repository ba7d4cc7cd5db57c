//! Drives the assistant conversation with retries and a fallback report.
//!
//! Each attempt walks the thread protocol: create a thread, post the prompt,
//! start a run, poll it, read the newest assistant message. Any failure moves
//! to the next attempt after a linear backoff. When attempts run out the
//! engine returns the fallback report, so [`AnalysisEngine::analyze`] always
//! yields a usable result.

use std::time::Duration;

use careerlens_core::{AppConfig, ObjectiveTag};
use serde_json::Value;

use crate::assistant::AssistantClient;
use crate::error::AnalysisError;
use crate::fallback::fallback_report;
use crate::polling::{PollStep, RunPoll};
use crate::prompt::{build_prompt, STRUCTURED_OUTPUT_REQUEST};
use crate::types::AnalysisResult;

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub base_url: String,
    pub api_key: String,
    pub assistant_id: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    /// Wait before retry `n` is `retry_backoff × n`.
    pub retry_backoff: Duration,
    pub poll_interval: Duration,
    pub max_polls: u32,
    /// Send a second user turn asking for a single JSON object.
    pub request_json_turn: bool,
}

impl AnalysisConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.openai_base_url.clone(),
            api_key: config.openai_api_key.clone(),
            assistant_id: config.openai_assistant_id.clone(),
            timeout_secs: config.llm_timeout_secs,
            max_attempts: config.llm_max_attempts,
            retry_backoff: Duration::from_millis(config.llm_retry_backoff_ms),
            poll_interval: Duration::from_millis(config.llm_poll_interval_ms),
            max_polls: config.llm_max_polls,
            request_json_turn: true,
        }
    }
}

/// Text of a completed run together with the ids that produced it.
struct Completion {
    thread_id: String,
    run_id: String,
    text: String,
}

pub struct AnalysisEngine {
    client: AssistantClient,
    config: AnalysisConfig,
}

impl AnalysisEngine {
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the HTTP client cannot be built.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        let client = AssistantClient::new(&config.base_url, &config.api_key, config.timeout_secs)?;
        Ok(Self { client, config })
    }

    /// Analyzes `profile` for `objective`. Provider failures never surface;
    /// after the last failed attempt the fallback report is returned.
    pub async fn analyze(&self, profile: &Value, objective: &ObjectiveTag) -> AnalysisResult {
        let prompt = build_prompt(profile, objective);
        let max_attempts = self.config.max_attempts.max(1);
        let mut last_error: Option<AnalysisError> = None;

        for attempt in 1..=max_attempts {
            let delay = backoff_before(attempt, self.config.retry_backoff);
            if !delay.is_zero() {
                tracing::debug!(attempt, ?delay, "backing off before retry");
                tokio::time::sleep(delay).await;
            }

            match self.run_attempt(&prompt).await {
                Ok(completion) => {
                    tracing::info!(
                        attempt,
                        thread_id = %completion.thread_id,
                        run_id = %completion.run_id,
                        "analysis completed"
                    );
                    return AnalysisResult::from_assistant(
                        completion.text,
                        completion.thread_id,
                        completion.run_id,
                        objective.clone(),
                    );
                }
                Err(e) => {
                    tracing::warn!(attempt, max_attempts, error = %e, "analysis attempt failed");
                    last_error = Some(e);
                }
            }
        }

        tracing::warn!(
            attempts = max_attempts,
            last_error = %last_error.as_ref().map_or_else(String::new, ToString::to_string),
            "analysis attempts exhausted; returning fallback report"
        );
        AnalysisResult::fallback(fallback_report(profile, objective), objective.clone())
    }

    async fn run_attempt(&self, prompt: &str) -> Result<Completion, AnalysisError> {
        let thread = self.client.create_thread().await?;
        self.client.add_user_message(&thread.id, prompt).await?;
        if self.config.request_json_turn {
            self.client
                .add_user_message(&thread.id, STRUCTURED_OUTPUT_REQUEST)
                .await?;
        }

        let run = self
            .client
            .start_run(&thread.id, &self.config.assistant_id)
            .await?;
        self.await_run(&thread.id, &run.id).await?;

        let text = self
            .client
            .list_messages(&thread.id)
            .await?
            .latest_assistant_text()
            .ok_or(AnalysisError::EmptyResponse)?;

        Ok(Completion {
            thread_id: thread.id,
            run_id: run.id,
            text,
        })
    }

    async fn await_run(&self, thread_id: &str, run_id: &str) -> Result<(), AnalysisError> {
        let mut poll = RunPoll::new(self.config.max_polls);
        loop {
            let run = self.client.get_run(thread_id, run_id).await?;
            match poll.observe(&run.status) {
                PollStep::Continue => {
                    tracing::debug!(run_id, status = %run.status, polls = poll.polls(), "run pending");
                    tokio::time::sleep(self.config.poll_interval).await;
                }
                PollStep::Completed => return Ok(()),
                PollStep::Failed(status) => return Err(AnalysisError::RunFailed { status }),
                PollStep::TimedOut => {
                    return Err(AnalysisError::RunTimeout {
                        polls: poll.polls(),
                    })
                }
            }
        }
    }
}

/// Wait before `attempt` (1-based). The first attempt starts at once and the
/// last one is followed by the fallback report, not a wait, so three attempts
/// with a 2s base wait 2s then 4s.
fn backoff_before(attempt: u32, base: Duration) -> Duration {
    base * attempt.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_linearly_between_attempts() {
        let base = Duration::from_secs(2);
        let waits: Vec<_> = (1..=3).map(|attempt| backoff_before(attempt, base)).collect();
        assert_eq!(
            waits,
            vec![Duration::ZERO, Duration::from_secs(2), Duration::from_secs(4)]
        );
    }

    #[test]
    fn zero_attempt_does_not_underflow() {
        assert_eq!(backoff_before(0, Duration::from_secs(2)), Duration::ZERO);
    }
}
