//! Harvest coordinator - the fetch/extract/persist pipeline
//!
//! This module owns a run from start to finish:
//! - Fetching the seed page and discovering related links
//! - Launching one concurrent task per related link
//! - Waiting on every task and applying the failure policy

use crate::config::{FailurePolicy, HarvestConfig, HarvestSettings};
use crate::harvester::extractor::{discover_links, extract_record, resolve_link, SelectorSet};
use crate::harvester::fetcher::Fetcher;
use crate::harvester::report::{HarvestReport, SavedArticle, TaskFailure};
use crate::state::{TaskState, TaskTracker};
use crate::storage::ArticleStore;
use crate::HarvestError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// What a finished task hands back to the coordinator
#[derive(Debug)]
struct TaskOutcome {
    url: String,
    result: Result<i64, HarvestError>,
}

/// Main harvest coordinator
///
/// All collaborators are injected at construction; the coordinator holds no
/// process-wide state.
pub struct Harvester {
    fetcher: Fetcher,
    store: Arc<dyn ArticleStore>,
    selectors: Arc<SelectorSet>,
    config: HarvestConfig,
}

impl Harvester {
    /// Creates a coordinator from its collaborators
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(HarvestError::Config)` - A configured selector failed to compile
    pub fn new(
        fetcher: Fetcher,
        store: Arc<dyn ArticleStore>,
        settings: &HarvestSettings,
    ) -> Result<Self, HarvestError> {
        let selectors = SelectorSet::compile(&settings.selectors)?;

        Ok(Self {
            fetcher,
            store,
            selectors: Arc::new(selectors),
            config: settings.harvest.clone(),
        })
    }

    /// Creates a coordinator with an HTTP client built from `settings`
    pub fn from_settings(
        store: Arc<dyn ArticleStore>,
        settings: &HarvestSettings,
    ) -> Result<Self, HarvestError> {
        let fetcher = Fetcher::from_user_agent(&settings.user_agent)?;
        Self::new(fetcher, store, settings)
    }

    /// Runs one harvest starting from `seed_url`
    ///
    /// 1. Fetch the seed page; any error ends the run before a task starts
    /// 2. Discover related hrefs and resolve them against the base origin
    /// 3. Spawn one task per target (fetch → extract → save)
    /// 4. Wait for every task, applying the failure policy
    ///
    /// Under `FailurePolicy::Abort` the first task error cancels the tasks
    /// still in flight and is returned as `HarvestError::TaskFailed`. A
    /// sibling already inside its store insert when the abort lands still
    /// commits its row. Under `FailurePolicy::Collect` every task finishes and
    /// failures are listed in the report.
    pub async fn run(&self, seed_url: &str) -> Result<HarvestReport, HarvestError> {
        tracing::info!("Fetching seed page {}", seed_url);

        let targets: Vec<String> = {
            let seed = self.fetcher.fetch(seed_url).await?;
            discover_links(&seed, &self.selectors)
                .iter()
                .map(|href| resolve_link(&self.config.base_origin, href))
                .collect()
        };

        tracing::info!("Discovered {} related links on {}", targets.len(), seed_url);

        let mut report = HarvestReport::new(seed_url, targets.len());
        if targets.is_empty() {
            return Ok(report);
        }

        let permits = admission_limit(self.config.max_concurrent_tasks, targets.len());
        tracing::debug!(
            "Launching {} tasks with {} concurrent slots ({:?} policy)",
            targets.len(),
            permits,
            self.config.failure_policy
        );

        let semaphore = Arc::new(Semaphore::new(permits));
        let mut tasks = JoinSet::new();

        for url in targets {
            let fetcher = self.fetcher.clone();
            let store = Arc::clone(&self.store);
            let selectors = Arc::clone(&self.selectors);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let mut tracker = TaskTracker::new(url);
                let result =
                    run_task(&mut tracker, &fetcher, &*store, &selectors, &semaphore).await;
                if let Err(e) = &result {
                    let failed_in = tracker.state();
                    tracker.abort();
                    tracing::debug!(
                        "Task for {} failed while {}: {}",
                        tracker.url(),
                        failed_in,
                        e
                    );
                }
                TaskOutcome {
                    url: tracker.url().to_string(),
                    result,
                }
            });
        }

        // The JoinSet is the completion barrier
        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    tasks.shutdown().await;
                    return Err(HarvestError::TaskPanicked(e.to_string()));
                }
            };

            match outcome.result {
                Ok(id) => {
                    tracing::debug!("Saved article {} from {}", id, outcome.url);
                    report.saved.push(SavedArticle {
                        url: outcome.url,
                        id,
                    });
                }
                Err(error) => match self.config.failure_policy {
                    FailurePolicy::Abort => {
                        tracing::debug!(
                            "Aborting {} remaining tasks after failure on {}",
                            tasks.len(),
                            outcome.url
                        );
                        tasks.shutdown().await;
                        return Err(HarvestError::TaskFailed {
                            url: outcome.url,
                            source: Box::new(error),
                        });
                    }
                    FailurePolicy::Collect => {
                        tracing::warn!("Task for {} failed: {}", outcome.url, error);
                        report.failures.push(TaskFailure {
                            url: outcome.url,
                            error: error.to_string(),
                        });
                    }
                },
            }
        }

        Ok(report)
    }
}

/// Number of tasks allowed to run at once
///
/// A configured limit of 0 means one slot per target.
fn admission_limit(configured: usize, targets: usize) -> usize {
    if configured == 0 {
        targets
    } else {
        configured.min(targets)
    }
}

/// Processes one related-link target: fetch, extract, save
async fn run_task(
    tracker: &mut TaskTracker,
    fetcher: &Fetcher,
    store: &dyn ArticleStore,
    selectors: &SelectorSet,
    semaphore: &Semaphore,
) -> Result<i64, HarvestError> {
    let _permit = semaphore
        .acquire()
        .await
        .map_err(|_| HarvestError::TaskPanicked("admission semaphore closed".to_string()))?;

    tracker.advance(TaskState::Fetching)?;

    // Document is !Send; keep it out of scope of any later await
    let record = {
        let document = fetcher.fetch(tracker.url()).await?;
        tracker.advance(TaskState::Extracting)?;
        extract_record(&document, selectors)
    };

    tracker.advance(TaskState::Saving)?;
    let id = store.save(&record).map_err(|source| HarvestError::Persist {
        url: record.url.clone(),
        source,
    })?;

    tracker.advance(TaskState::Done)?;
    Ok(id)
}
