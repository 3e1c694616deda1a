//! Sources of page layout.
//!
//! A [`LayoutProvider`] exposes the structured text of a document together
//! with the table and drawing rectangles the region detector needs. The
//! crate ships a `lopdf`-backed provider and an in-memory one; callers with
//! their own layout engine implement the trait directly.

mod content;
mod layout;
mod memory;
mod pdf;
pub mod tables;

pub use content::RawSpan;
pub use memory::MemoryProvider;
pub use pdf::{detect_pdf_version, LopdfProvider};
pub use tables::{TableExtent, TableFinder, TableFinderConfig};

use crate::error::Result;
use crate::model::{BBox, DocumentMetadata, Page};

/// Read access to the layout of one document.
///
/// Page numbers are 1-indexed. Every geometry value is in top-down page
/// units with the origin at the top-left corner.
pub trait LayoutProvider {
    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Document information.
    fn metadata(&self) -> Result<DocumentMetadata>;

    /// Structured text of a page.
    fn page(&self, number: u32) -> Result<Page>;

    /// Bounding boxes of tables on a page.
    fn tables(&self, number: u32) -> Result<Vec<BBox>>;

    /// Bounding boxes of vector drawings on a page.
    fn drawings(&self, number: u32) -> Result<Vec<BBox>>;

    /// Whether a page carries extractable text.
    fn has_native_text(&self, number: u32) -> Result<bool> {
        Ok(self.page(number)?.has_text())
    }

    /// Up to `max_chars` characters of a page's plain text.
    fn text_sample(&self, number: u32, max_chars: usize) -> Result<String> {
        let text = self.page(number)?.plain_text();
        Ok(text.trim().chars().take(max_chars).collect())
    }
}

impl<P: LayoutProvider + ?Sized> LayoutProvider for &P {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn metadata(&self) -> Result<DocumentMetadata> {
        (**self).metadata()
    }

    fn page(&self, number: u32) -> Result<Page> {
        (**self).page(number)
    }

    fn tables(&self, number: u32) -> Result<Vec<BBox>> {
        (**self).tables(number)
    }

    fn drawings(&self, number: u32) -> Result<Vec<BBox>> {
        (**self).drawings(number)
    }

    fn has_native_text(&self, number: u32) -> Result<bool> {
        (**self).has_native_text(number)
    }

    fn text_sample(&self, number: u32, max_chars: usize) -> Result<String> {
        (**self).text_sample(number, max_chars)
    }
}

/// Optical character recognition for pages without native text.
pub trait OcrEngine {
    /// Recognize a page.
    ///
    /// `native` is the page as the provider reported it (geometry, possibly
    /// image blocks). `languages` is a '+'-joined language string such as
    /// `"eng+fra"`. The returned page replaces `native` for all analysis.
    fn recognize(&self, native: &Page, languages: &str) -> Result<Page>;
}
