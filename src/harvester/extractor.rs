//! Record extraction and related-link discovery
//!
//! Field extraction is a declarative, ordered list of `(ArticleField, Selector)`
//! pairs evaluated the same way for every field. Link discovery runs only on
//! the seed document.

use crate::article::{ArticleField, ArticleRecord};
use crate::config::SelectorConfig;
use crate::harvester::fetcher::Document;
use crate::ConfigError;
use scraper::Selector;

/// Compiled selectors for one harvest run
#[derive(Debug, Clone)]
pub struct SelectorSet {
    related_links: Selector,
    fields: Vec<(ArticleField, Selector)>,
}

impl SelectorSet {
    /// Parses every configured selector
    ///
    /// # Returns
    ///
    /// * `Ok(SelectorSet)` - All selectors parsed
    /// * `Err(ConfigError::InvalidSelector)` - A selector failed to parse
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        let related_links = compile_selector("related-links", &config.related_links)?;

        let mut fields = Vec::with_capacity(3);
        for (field, css) in [
            (ArticleField::Title, &config.title),
            (ArticleField::Author, &config.author),
            (ArticleField::CreatedDate, &config.created_date),
        ] {
            fields.push((field, compile_selector(field.name(), css)?));
        }

        Ok(Self {
            related_links,
            fields,
        })
    }

    /// The field mapping in evaluation order
    pub fn fields(&self) -> &[(ArticleField, Selector)] {
        &self.fields
    }
}

fn compile_selector(name: &str, css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css)
        .map_err(|e| ConfigError::InvalidSelector(format!("{} selector '{}': {:?}", name, css, e)))
}

/// Builds an article record from a fetched target page
///
/// Extraction never fails: a field whose selector matches nothing is left
/// as an empty string.
pub fn extract_record(document: &Document, selectors: &SelectorSet) -> ArticleRecord {
    let mut record = ArticleRecord::new(document.url());

    for (field, selector) in selectors.fields() {
        record.set_field(*field, first_text(document, selector));
        tracing::trace!(
            "{} {} = {:?}",
            document.url(),
            field,
            record.field(*field)
        );
    }

    record
}

/// Concatenated text of the first element matching `selector`, as rendered
fn first_text(document: &Document, selector: &Selector) -> String {
    document
        .html()
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>())
        .unwrap_or_default()
}

/// Collects the raw related-link hrefs from the seed document
///
/// Hrefs are returned in document order and are not deduplicated. Matched
/// elements without an `href` attribute are skipped.
pub fn discover_links(document: &Document, selectors: &SelectorSet) -> Vec<String> {
    let mut links = Vec::new();

    for element in document.html().select(&selectors.related_links) {
        match element.value().attr("href") {
            Some(href) => links.push(href.to_string()),
            None => tracing::debug!(
                "Skipping related element without href on {}",
                document.url()
            ),
        }
    }

    links
}

/// Turns a discovered href into a fetch target
///
/// This is plain concatenation of the base origin and the href, with no
/// URL normalization.
pub fn resolve_link(base_origin: &str, href: &str) -> String {
    format!("{}{}", base_origin, href)
}
