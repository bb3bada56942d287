//! Harvester module: the concurrent fetch/extract/persist pipeline
//!
//! - HTTP fetching with strict status checking
//! - Declarative field extraction and related-link discovery
//! - Run coordination with a bounded task fan-out

mod coordinator;
mod extractor;
mod fetcher;
mod report;

pub use coordinator::Harvester;
pub use extractor::{discover_links, extract_record, resolve_link, SelectorSet};
pub use fetcher::{build_http_client, Document, Fetcher};
pub use report::{HarvestReport, SavedArticle, TaskFailure};

use crate::config::HarvestSettings;
use crate::storage::ArticleStore;
use crate::HarvestError;
use std::sync::Arc;

/// Runs a complete harvest from `seed_url`
///
/// # Example
///
/// ```no_run
/// use article_harvester::config::HarvestSettings;
/// use article_harvester::harvester::harvest;
/// use article_harvester::storage::SqliteStore;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(SqliteStore::open_in_memory()?);
/// let report = harvest(store, &HarvestSettings::default(), "https://example.com/seed").await?;
/// println!("Saved {} articles", report.saved.len());
/// # Ok(())
/// # }
/// ```
pub async fn harvest(
    store: Arc<dyn ArticleStore>,
    settings: &HarvestSettings,
    seed_url: &str,
) -> Result<HarvestReport, HarvestError> {
    Harvester::from_settings(store, settings)?.run(seed_url).await
}
