//! Page-level layout types.
//!
//! This is the structure a layout provider hands to the outline pipeline:
//! ordered blocks, each holding ordered lines, each holding ordered spans.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::BBox;

bitflags! {
    /// Style bits carried on a text span.
    ///
    /// Bit positions follow the common layout-provider convention
    /// (superscript = 1, italic = 2, serif = 4, monospace = 8, bold = 16).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SpanFlags: u32 {
        /// Superscripted text
        const SUPERSCRIPT = 1 << 0;
        /// Italic face
        const ITALIC = 1 << 1;
        /// Serif face
        const SERIFED = 1 << 2;
        /// Monospaced face
        const MONOSPACED = 1 << 3;
        /// Bold face
        const BOLD = 1 << 4;
    }
}

/// Font-name fragments that mark an emphasized (bold) face.
const BOLD_NAME_MARKERS: [&str; 3] = ["bold", "black", "heavy"];

/// A run of text sharing one font size, name and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Font size in points
    pub size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    #[serde(default)]
    pub font: String,
    /// Raw style bits, see [`SpanFlags`]
    #[serde(default)]
    pub flags: u32,
}

impl TextSpan {
    /// Create a new span with no style bits.
    pub fn new(text: impl Into<String>, size: f32, font: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size,
            font: font.into(),
            flags: 0,
        }
    }

    /// Set the raw style bits.
    pub fn with_flags(mut self, flags: SpanFlags) -> Self {
        self.flags = flags.bits();
        self
    }

    /// Decoded style bits.
    pub fn style(&self) -> SpanFlags {
        SpanFlags::from_bits_truncate(self.flags)
    }

    /// Bold by flag bit or by font-name marker.
    pub fn is_emphasized(&self) -> bool {
        if self.style().contains(SpanFlags::BOLD) {
            return true;
        }
        let name = self.font.to_lowercase();
        BOLD_NAME_MARKERS.iter().any(|m| name.contains(m))
    }

    /// Font size rounded to the nearest integer, ties to even.
    pub fn rounded_size(&self) -> i32 {
        round_size(self.size)
    }
}

/// Round a font size the way the histogram and level map key sizes.
pub fn round_size(size: f32) -> i32 {
    size.round_ties_even() as i32
}

/// A line of text composed of spans on the same baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Bounding box of the line
    pub bbox: BBox,
    /// Spans in reading order
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    /// Create a line from its box and spans.
    pub fn new(bbox: BBox, spans: Vec<TextSpan>) -> Self {
        Self { bbox, spans }
    }

    /// Span texts joined with a single space and trimmed.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }

    /// Rounded size of the first span, or `None` for an empty line.
    pub fn first_size(&self) -> Option<i32> {
        self.spans.first().map(TextSpan::rounded_size)
    }

    /// True if any span is bold.
    pub fn is_emphasized(&self) -> bool {
        self.spans.iter().any(TextSpan::is_emphasized)
    }
}

/// Kind of a layout block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// A block of text lines
    #[default]
    Text,
    /// An image placement; carries no lines
    Image,
}

/// A block of lines (paragraph, heading, caption).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Bounding box of the block
    pub bbox: BBox,
    /// Block kind
    #[serde(default)]
    pub kind: BlockKind,
    /// Lines in reading order
    #[serde(default)]
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    /// Create a text block.
    pub fn new(bbox: BBox, lines: Vec<TextLine>) -> Self {
        Self {
            bbox,
            kind: BlockKind::Text,
            lines,
        }
    }

    /// Create an image block.
    pub fn image(bbox: BBox) -> Self {
        Self {
            bbox,
            kind: BlockKind::Image,
            lines: Vec::new(),
        }
    }

    /// Check if this is a text block.
    pub fn is_text(&self) -> bool {
        self.kind == BlockKind::Text
    }

    /// All span texts of the block, lines separated by a newline.
    pub fn raw_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|s| s.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Left edge of the first line, if any.
    pub fn first_line_x(&self) -> Option<f32> {
        self.lines.first().map(|l| l.bbox.x0)
    }
}

/// A single page of layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Blocks in reading order
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            blocks: Vec::new(),
        }
    }

    /// Create an empty US Letter page.
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: TextBlock) {
        self.blocks.push(block);
    }

    /// Iterate over every line of every text block.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.blocks
            .iter()
            .filter(|b| b.is_text())
            .flat_map(|b| b.lines.iter())
    }

    /// Whether the page carries any non-whitespace text.
    pub fn has_text(&self) -> bool {
        self.lines()
            .flat_map(|l| l.spans.iter())
            .any(|s| !s.text.trim().is_empty())
    }

    /// Plain text of the page, one line per text line.
    pub fn plain_text(&self) -> String {
        self.lines()
            .map(TextLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_bold_by_flag_or_name() {
        let plain = TextSpan::new("Text", 12.0, "Helvetica");
        assert!(!plain.is_emphasized());

        let flagged = TextSpan::new("Text", 12.0, "Helvetica").with_flags(SpanFlags::BOLD);
        assert!(flagged.is_emphasized());

        let named = TextSpan::new("Text", 12.0, "Arial-BlackItalic");
        assert!(named.is_emphasized());

        let heavy = TextSpan::new("Text", 12.0, "Avenir-Heavy");
        assert!(heavy.is_emphasized());
    }

    #[test]
    fn test_italic_flag_is_not_bold() {
        let span = TextSpan::new("Text", 12.0, "Times").with_flags(SpanFlags::ITALIC);
        assert!(!span.is_emphasized());
        assert!(span.style().contains(SpanFlags::ITALIC));
    }

    #[test]
    fn test_round_size_ties_to_even() {
        assert_eq!(round_size(12.4), 12);
        assert_eq!(round_size(12.5), 12);
        assert_eq!(round_size(13.5), 14);
        assert_eq!(round_size(15.97), 16);
    }

    #[test]
    fn test_line_text_joins_spans() {
        let line = TextLine::new(
            BBox::new(0.0, 0.0, 100.0, 12.0),
            vec![
                TextSpan::new("Chapter", 18.0, "Times"),
                TextSpan::new("1: ", 18.0, "Times"),
            ],
        );
        assert_eq!(line.text(), "Chapter 1:");
        assert_eq!(line.first_size(), Some(18));
    }

    #[test]
    fn test_page_lines_skip_images() {
        let mut page = Page::letter(1);
        page.add_block(TextBlock::image(BBox::new(0.0, 0.0, 50.0, 50.0)));
        page.add_block(TextBlock::new(
            BBox::new(0.0, 60.0, 100.0, 72.0),
            vec![TextLine::new(
                BBox::new(0.0, 60.0, 100.0, 72.0),
                vec![TextSpan::new("Hello", 12.0, "Helvetica")],
            )],
        ));

        assert_eq!(page.lines().count(), 1);
        assert!(page.has_text());
        assert_eq!(page.plain_text(), "Hello");
    }

    #[test]
    fn test_page_deserialize_defaults() {
        let json = r#"{
            "number": 1, "width": 612, "height": 792,
            "blocks": [{ "bbox": {"x0": 0, "y0": 0, "x1": 10, "y1": 10},
                         "lines": [{ "bbox": {"x0": 0, "y0": 0, "x1": 10, "y1": 10},
                                     "spans": [{"text": "Hi", "size": 12.0}] }] }]
        }"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert_eq!(page.blocks[0].kind, BlockKind::Text);
        assert_eq!(page.blocks[0].lines[0].spans[0].flags, 0);
        assert_eq!(page.blocks[0].lines[0].spans[0].font, "");
    }
}
