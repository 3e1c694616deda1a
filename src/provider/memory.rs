//! Layout held in memory.
//!
//! Useful when layout comes from another engine, and for tests. A document
//! can be built in code or loaded from JSON:
//!
//! ```
//! use unoutline::provider::{LayoutProvider, MemoryProvider};
//!
//! let json = r#"{
//!     "metadata": { "title": "Field Notes" },
//!     "pages": [ { "number": 1, "width": 612, "height": 792, "blocks": [] } ]
//! }"#;
//! let provider = MemoryProvider::from_json(json).unwrap();
//! assert_eq!(provider.page_count(), 1);
//! ```

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{BBox, DocumentMetadata, Page};

use super::LayoutProvider;

/// One page plus its externally detected tables and drawings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryPage {
    /// Structured text
    #[serde(flatten)]
    pub page: Page,
    /// Table bounding boxes
    #[serde(default)]
    pub tables: Vec<BBox>,
    /// Drawing bounding boxes
    #[serde(default)]
    pub drawings: Vec<BBox>,
    /// When set, table and drawing extraction fail with this reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_error: Option<String>,
}

impl MemoryPage {
    /// Wrap a page with no tables or drawings.
    pub fn new(page: Page) -> Self {
        Self {
            page,
            tables: Vec::new(),
            drawings: Vec::new(),
            region_error: None,
        }
    }
}

/// A document whose layout is already known.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryProvider {
    /// Document information
    #[serde(default)]
    pub metadata: DocumentMetadata,
    /// Pages in order; page `n` is at index `n - 1`
    #[serde(default)]
    pub pages: Vec<MemoryPage>,
}

impl MemoryProvider {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a document from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Set the metadata title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    /// Append a page without tables or drawings.
    pub fn with_page(self, page: Page) -> Self {
        self.with_regions(page, Vec::new(), Vec::new())
    }

    /// Append a page with its tables and drawings.
    pub fn with_regions(mut self, page: Page, tables: Vec<BBox>, drawings: Vec<BBox>) -> Self {
        self.pages.push(MemoryPage {
            tables,
            drawings,
            ..MemoryPage::new(page)
        });
        self
    }

    /// Make table and drawing extraction fail for a page.
    pub fn with_region_error(mut self, number: u32, reason: impl Into<String>) -> Self {
        let index = number.checked_sub(1).map(|i| i as usize);
        if let Some(p) = index.and_then(|i| self.pages.get_mut(i)) {
            p.region_error = Some(reason.into());
        }
        self
    }

    fn get(&self, number: u32) -> Result<&MemoryPage> {
        number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .ok_or(Error::PageOutOfRange(number, self.page_count()))
    }

    fn regions(&self, number: u32, pick: fn(&MemoryPage) -> &Vec<BBox>) -> Result<Vec<BBox>> {
        let page = self.get(number)?;
        match &page.region_error {
            Some(reason) => Err(Error::RegionDetection {
                page: number,
                reason: reason.clone(),
            }),
            None => Ok(pick(page).clone()),
        }
    }
}

impl LayoutProvider for MemoryProvider {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn metadata(&self) -> Result<DocumentMetadata> {
        Ok(DocumentMetadata {
            page_count: self.page_count(),
            ..self.metadata.clone()
        })
    }

    fn page(&self, number: u32) -> Result<Page> {
        Ok(self.get(number)?.page.clone())
    }

    fn tables(&self, number: u32) -> Result<Vec<BBox>> {
        self.regions(number, |p| &p.tables)
    }

    fn drawings(&self, number: u32) -> Result<Vec<BBox>> {
        self.regions(number, |p| &p.drawings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TextBlock, TextLine, TextSpan};

    fn sample() -> MemoryProvider {
        let mut page = Page::letter(1);
        let bbox = BBox::new(72.0, 72.0, 300.0, 90.0);
        page.add_block(TextBlock::new(
            bbox,
            vec![TextLine::new(bbox, vec![TextSpan::new("Hello", 18.0, "Arial")])],
        ));
        MemoryProvider::new()
            .with_title("Greeting")
            .with_regions(page, vec![BBox::new(0.0, 400.0, 600.0, 500.0)], Vec::new())
            .with_page(Page::letter(2))
    }

    #[test]
    fn test_pages_and_regions() {
        let provider = sample();
        assert_eq!(provider.page_count(), 2);
        assert_eq!(provider.metadata().unwrap().page_count, 2);
        assert_eq!(provider.page(1).unwrap().plain_text(), "Hello");
        assert_eq!(provider.tables(1).unwrap().len(), 1);
        assert!(provider.drawings(2).unwrap().is_empty());
        assert!(provider.has_native_text(1).unwrap());
        assert!(!provider.has_native_text(2).unwrap());
        assert_eq!(provider.text_sample(1, 3).unwrap(), "Hel");
    }

    #[test]
    fn test_out_of_range() {
        let provider = sample();
        assert!(matches!(provider.page(0), Err(Error::PageOutOfRange(0, 2))));
        assert!(matches!(provider.page(3), Err(Error::PageOutOfRange(3, 2))));
    }

    #[test]
    fn test_region_error() {
        let provider = sample().with_region_error(2, "broken drawing list");
        assert!(matches!(
            provider.drawings(2),
            Err(Error::RegionDetection { page: 2, .. })
        ));
        assert!(provider.page(2).is_ok());
    }

    #[test]
    fn test_json_round_trip_keeps_layout() {
        let provider = sample();
        let json = serde_json::to_string(&provider).unwrap();
        let loaded = MemoryProvider::from_json(&json).unwrap();
        assert_eq!(loaded, provider);
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "pages": [{
                "number": 1, "width": 600, "height": 800,
                "blocks": [{
                    "bbox": {"x0": 10, "y0": 10, "x1": 200, "y1": 30},
                    "lines": [{
                        "bbox": {"x0": 10, "y0": 10, "x1": 200, "y1": 30},
                        "spans": [{"text": "Intro", "size": 16}]
                    }]
                }],
                "drawings": [{"x0": 0, "y0": 0, "x1": 50, "y1": 50}]
            }]
        }"#;
        let provider = MemoryProvider::from_json(json).unwrap();
        assert!(provider.metadata.title.is_none());
        assert_eq!(provider.drawings(1).unwrap().len(), 1);
        assert!(provider.tables(1).unwrap().is_empty());
        let page = provider.page(1).unwrap();
        assert_eq!(page.lines().next().unwrap().first_size(), Some(16));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            MemoryProvider::from_json("{ not json"),
            Err(Error::Serialize(_))
        ));
    }
}
