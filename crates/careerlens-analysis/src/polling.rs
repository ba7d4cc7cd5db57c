//! Bounded run-status polling as a pure state machine.
//!
//! The engine feeds each observed run status into [`RunPoll::observe`] and
//! sleeps only on [`PollStep::Continue`], so the transitions are testable
//! without a clock.

/// What the poller should do after one status observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep {
    /// Still pending; wait one interval and poll again.
    Continue,
    Completed,
    /// Terminal failure status (`failed`, `cancelled`, `expired`).
    Failed(String),
    /// Poll budget spent without reaching a terminal status.
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct RunPoll {
    polls: u32,
    max_polls: u32,
}

impl RunPoll {
    #[must_use]
    pub fn new(max_polls: u32) -> Self {
        Self {
            polls: 0,
            max_polls: max_polls.max(1),
        }
    }

    /// Records one observed status and returns the next step.
    pub fn observe(&mut self, status: &str) -> PollStep {
        self.polls += 1;
        match status {
            "completed" => PollStep::Completed,
            "failed" | "cancelled" | "expired" => PollStep::Failed(status.to_owned()),
            _ if self.polls >= self.max_polls => PollStep::TimedOut,
            _ => PollStep::Continue,
        }
    }

    #[must_use]
    pub fn polls(&self) -> u32 {
        self.polls
    }
}
