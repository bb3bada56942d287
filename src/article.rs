//! The harvested article record

use std::fmt;

/// One article harvested from a related-link target page
///
/// `url` is always the page the record was extracted from. The remaining
/// fields are best effort and are empty when the page has no matching element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleRecord {
    pub url: String,
    pub title: String,
    pub author: String,
    pub created_date: String,
}

/// Fields filled in by selector-based extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArticleField {
    Title,
    Author,
    CreatedDate,
}

impl ArticleRecord {
    /// Creates a record for `url` with every extracted field empty
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Writes one extracted field
    pub fn set_field(&mut self, field: ArticleField, value: String) {
        match field {
            ArticleField::Title => self.title = value,
            ArticleField::Author => self.author = value,
            ArticleField::CreatedDate => self.created_date = value,
        }
    }

    /// Reads one extracted field
    pub fn field(&self, field: ArticleField) -> &str {
        match field {
            ArticleField::Title => &self.title,
            ArticleField::Author => &self.author,
            ArticleField::CreatedDate => &self.created_date,
        }
    }
}

impl ArticleField {
    /// Name used in configuration and log output
    pub fn name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::CreatedDate => "created-date",
        }
    }
}

impl fmt::Display for ArticleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
