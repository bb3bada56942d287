//! State module for tracking harvest task progress
//!
//! - `TaskState`: the lifecycle of one related-link task
//! - `TaskTracker`: a task's current state with checked transitions

mod task_state;

pub use task_state::TaskState;

use crate::HarvestError;

/// Current state of one harvest task, identified by its target URL
#[derive(Debug, Clone)]
pub struct TaskTracker {
    url: String,
    state: TaskState,
}

impl TaskTracker {
    /// Creates a tracker in the `Pending` state
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: TaskState::Pending,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Moves to `next`, rejecting transitions outside the task lifecycle
    pub fn advance(&mut self, next: TaskState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!("Task {}: {} -> {}", self.url, self.state, next);
        self.state = next;
        Ok(())
    }

    /// Marks the task as aborted after an error
    ///
    /// Unlike `advance`, this always succeeds from a non-terminal state so an
    /// unexpected failure can never leave a task looking active.
    pub fn abort(&mut self) {
        if !self.state.is_terminal() {
            tracing::debug!("Task {}: {} -> {}", self.url, self.state, TaskState::Aborted);
            self.state = TaskState::Aborted;
        }
    }
}
