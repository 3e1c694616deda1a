//! Outline output records.

use serde::{Deserialize, Serialize};

/// Title reported for a document whose processing failed in a batch.
pub const PROCESSING_ERROR_TITLE: &str = "Processing Error";

/// A detected heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Level label ("H1", "H2", ...)
    pub level: String,
    /// Heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

impl Heading {
    /// Create a heading at a numeric level.
    pub fn new(level: usize, text: impl Into<String>, page: u32) -> Self {
        Self {
            level: level_label(level),
            text: text.into(),
            page,
        }
    }

    /// Numeric level parsed back from the label, if it has the `H<n>` form.
    pub fn level_number(&self) -> Option<usize> {
        self.level.strip_prefix('H')?.parse().ok()
    }
}

/// Label for a numeric heading level.
pub fn level_label(level: usize) -> String {
    format!("H{}", level)
}

/// Title plus ordered headings for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineResult {
    /// Resolved title (may be empty)
    pub title: String,
    /// Headings in page-then-line order
    pub outline: Vec<Heading>,
}

impl OutlineResult {
    /// Create a result.
    pub fn new(title: impl Into<String>, outline: Vec<Heading>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// A result with a title and no headings.
    pub fn title_only(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }

    /// The canonical result written for a document that failed in a batch.
    pub fn processing_error() -> Self {
        Self::title_only(PROCESSING_ERROR_TITLE)
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.outline.len()
    }

    /// Check if no headings were found.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_serialization_shape() {
        let heading = Heading::new(1, "Chapter 1: Overview", 3);
        let json = serde_json::to_string(&heading).unwrap();
        assert_eq!(
            json,
            r#"{"level":"H1","text":"Chapter 1: Overview","page":3}"#
        );
        assert_eq!(heading.level_number(), Some(1));
    }

    #[test]
    fn test_processing_error_shape() {
        let json = serde_json::to_string(&OutlineResult::processing_error()).unwrap();
        assert_eq!(json, r#"{"title":"Processing Error","outline":[]}"#);
    }
}
