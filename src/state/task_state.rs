/// Task state definitions for tracking harvest progress
///
/// Every related-link target is processed by one task that walks through
/// these states in order.
use std::fmt;

/// Represents the current state of a harvest task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    // ===== Active States =====
    /// Task has been created but not yet admitted to run
    Pending,

    /// Target page is being downloaded
    Fetching,

    /// Fields are being extracted from the downloaded page
    Extracting,

    /// The extracted record is being written to the store
    Saving,

    // ===== Terminal States =====
    /// Record was saved
    Done,

    /// Task stopped on an error
    Aborted,
}

impl TaskState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if moving from `self` to `next` is allowed
    ///
    /// The happy path is strictly `Pending -> Fetching -> Extracting -> Saving
    /// -> Done`. Errors come from the network call and the store write, so
    /// `Aborted` is reachable from `Fetching` and `Saving`.
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Fetching)
                | (Self::Fetching, Self::Extracting)
                | (Self::Fetching, Self::Aborted)
                | (Self::Extracting, Self::Saving)
                | (Self::Saving, Self::Done)
                | (Self::Saving, Self::Aborted)
        )
    }

    /// Short lowercase label used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Saving => "saving",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }

    /// Returns all possible task states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Fetching,
            Self::Extracting,
            Self::Saving,
            Self::Done,
            Self::Aborted,
        ]
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
