//! Layout and outline types.
//!
//! The layout half (`Page` → `TextBlock` → `TextLine` → `TextSpan`) is what a
//! layout provider produces; the outline half (`Heading`, `OutlineResult`) is
//! what the pipeline emits.

mod document;
mod geometry;
mod outline;
mod page;

pub use document::DocumentMetadata;
pub use geometry::BBox;
pub use outline::{level_label, Heading, OutlineResult, PROCESSING_ERROR_TITLE};
pub use page::{round_size, BlockKind, Page, SpanFlags, TextBlock, TextLine, TextSpan};
