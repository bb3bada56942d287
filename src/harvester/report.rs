//! Outcome summary of a harvest run

/// An article that was written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArticle {
    pub url: String,
    pub id: i64,
}

/// A related-link task that ended in an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub url: String,
    pub error: String,
}

/// Harvest run summary
#[derive(Debug, Clone)]
pub struct HarvestReport {
    /// The seed page the run started from
    pub seed_url: String,

    /// Number of related links discovered (and tasks launched)
    pub discovered: usize,

    /// Articles saved, in completion order
    pub saved: Vec<SavedArticle>,

    /// Tasks that failed (only populated under the collect policy)
    pub failures: Vec<TaskFailure>,
}

impl HarvestReport {
    pub fn new(seed_url: impl Into<String>, discovered: usize) -> Self {
        Self {
            seed_url: seed_url.into(),
            discovered,
            saved: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// True when no task failed
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of tasks that reached a terminal state
    pub fn completed(&self) -> usize {
        self.saved.len() + self.failures.len()
    }

    /// Writes a one-line summary plus one line per failure to the log
    pub fn log_summary(&self) {
        tracing::info!(
            "Harvest of {}: {} of {} related links completed, {} saved, {} failed",
            self.seed_url,
            self.completed(),
            self.discovered,
            self.saved.len(),
            self.failures.len()
        );

        for failure in &self.failures {
            tracing::warn!("  {}: {}", failure.url, failure.error);
        }
    }
}
