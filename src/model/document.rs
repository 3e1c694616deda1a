//! Document-level metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document information dictionary contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// `/Title` from the info dictionary; preferred over layout inference.
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    /// Authoring application (`/Creator`).
    pub creator: Option<String>,
    /// Producing library (`/Producer`).
    pub producer: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    /// Header version such as "1.7", empty for in-memory documents.
    pub pdf_version: String,
    pub page_count: u32,
}

impl DocumentMetadata {
    /// Create metadata carrying only a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// The title if it is usable without layout analysis.
    ///
    /// Returns the trimmed title when it is non-empty and shorter than
    /// `max_chars` characters.
    pub fn usable_title(&self, max_chars: usize) -> Option<&str> {
        let title = self.title.as_deref()?.trim();
        if title.is_empty() || title.chars().count() >= max_chars {
            return None;
        }
        Some(title)
    }
}
