//! # unoutline
//!
//! Title and heading outline inference for PDF documents.
//!
//! The outline is rebuilt from layout signals alone (font size, weight,
//! position and page geometry), without bookmarks or tagged structure.
//! Tables, drawn boxes and callout blocks are excluded first so their text
//! never turns into headings.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unoutline::extract_outline_from_path;
//!
//! fn main() -> unoutline::Result<()> {
//!     let result = extract_outline_from_path("document.pdf")?;
//!     println!("{}", result.title);
//!     for heading in &result.outline {
//!         println!("{} {} (p. {})", heading.level, heading.text, heading.page);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Excluded regions**: tables, drawings and boxed prose are filtered out
//! - **Font levels**: a document-wide size histogram maps sizes to H1..Hn
//! - **Wrapped headings**: contiguous lines are joined before classification
//! - **Bold fallback**: bold body-size labels still become headings
//! - **Scanned documents**: pluggable OCR with a detected language hint
//! - **Batch mode**: one JSON file per PDF with per-file failure isolation

pub mod batch;
pub mod error;
pub mod extractor;
pub mod language;
pub mod model;
pub mod options;
pub mod outline;
pub mod provider;

// Re-export commonly used types
pub use batch::{process_directory, BatchReport};
pub use error::{Error, Result};
pub use extractor::{Inspection, OutlineExtractor};
pub use model::{BBox, DocumentMetadata, Heading, OutlineResult, Page, TextBlock, TextLine, TextSpan};
pub use options::ExtractOptions;
pub use provider::{LayoutProvider, LopdfProvider, MemoryProvider, OcrEngine};

use std::path::Path;

/// Extract the title and outline of a PDF file.
///
/// A file that cannot be opened yields a result whose title starts with
/// `"Error opening PDF: "`; other failures are returned as errors.
///
/// # Example
///
/// ```no_run
/// use unoutline::extract_outline_from_path;
///
/// let result = extract_outline_from_path("document.pdf").unwrap();
/// println!("{} headings", result.outline.len());
/// ```
pub fn extract_outline_from_path<P: AsRef<Path>>(path: P) -> Result<OutlineResult> {
    OutlineExtractor::new().extract_path(path)
}

/// Extract the title and outline of a PDF file with custom options.
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<OutlineResult> {
    OutlineExtractor::with_options(options).extract_path(path)
}

/// Extract the title and outline from any layout provider.
///
/// # Example
///
/// ```
/// use unoutline::{extract_outline, BBox, MemoryProvider, Page, TextBlock, TextLine, TextSpan};
///
/// let mut page = Page::letter(1);
/// let lines = [("Overview", 18.0), ("Plain body text", 11.0), ("More body text", 11.0)];
/// for (i, (text, size)) in lines.iter().enumerate() {
///     let top = 100.0 + 40.0 * i as f32;
///     let bbox = BBox::new(72.0, top, 400.0, top + size);
///     let line = TextLine::new(bbox, vec![TextSpan::new(*text, *size, "Helvetica")]);
///     page.add_block(TextBlock::new(bbox, vec![line]));
/// }
///
/// let provider = MemoryProvider::new().with_title("Field Guide").with_page(page);
/// let result = extract_outline(&provider).unwrap();
/// assert_eq!(result.title, "Field Guide");
/// assert_eq!(result.outline[0].level, "H1");
/// assert_eq!(result.outline[0].text, "Overview");
/// ```
pub fn extract_outline<P: LayoutProvider>(provider: &P) -> Result<OutlineResult> {
    OutlineExtractor::new().extract(provider)
}

/// Extract the outline of a PDF file as pretty-printed JSON.
pub fn outline_to_json<P: AsRef<Path>>(path: P) -> Result<String> {
    let result = extract_outline_from_path(path)?;
    Ok(serde_json::to_string_pretty(&result)?)
}
