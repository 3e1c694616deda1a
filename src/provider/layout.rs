//! Reconstruction of lines and blocks from positioned text runs.

use unicode_normalization::UnicodeNormalization;

use crate::model::{BBox, Page, SpanFlags, TextBlock, TextLine, TextSpan};

use super::content::{is_spaceless_script_char, RawRect, RawSpan};

/// Converts user-space runs into a top-down [`Page`].
#[derive(Debug, Clone)]
pub(crate) struct PageLayout {
    number: u32,
    media_box: RawRect,
}

/// A line under construction with the measurements block grouping needs.
#[derive(Debug, Clone)]
struct LineInfo {
    line: TextLine,
    baseline: f32,
    x: f32,
    font_size: f32,
}

impl PageLayout {
    pub fn new(number: u32, media_box: RawRect) -> Self {
        Self { number, media_box }
    }

    pub fn width(&self) -> f32 {
        self.media_box[2] - self.media_box[0]
    }

    pub fn height(&self) -> f32 {
        self.media_box[3] - self.media_box[1]
    }

    /// Convert a user-space rectangle to top-down page coordinates.
    pub fn to_page(&self, rect: RawRect) -> BBox {
        let [llx, _, _, ury] = self.media_box;
        BBox::new(rect[0] - llx, ury - rect[3], rect[2] - llx, ury - rect[1])
    }

    /// Build the page from its text runs.
    pub fn build(&self, spans: Vec<RawSpan>) -> Page {
        let mut page = Page::new(self.number, self.width(), self.height());
        let lines: Vec<LineInfo> = group_spans_into_lines(spans)
            .into_iter()
            .filter_map(|line| self.line_info(line))
            .collect();
        for block in self.group_lines_into_blocks(lines) {
            page.add_block(block);
        }
        page
    }

    fn line_info(&self, mut spans: Vec<RawSpan>) -> Option<LineInfo> {
        spans.sort_by(|a, b| a.x.total_cmp(&b.x));
        let first = spans.first()?;
        let baseline = first.y;
        let x = first.x;

        let total_chars: usize = spans.iter().map(|s| s.text.chars().count()).sum();
        let weighted: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.chars().count() as f32)
            .sum();
        let font_size = if total_chars > 0 {
            weighted / total_chars as f32
        } else {
            first.font_size
        };

        let rect = spans.iter().fold(
            [f32::MAX, f32::MAX, f32::MIN, f32::MIN],
            |[x0, y0, x1, y1], s| [x0.min(s.x), y0.min(s.bottom()), x1.max(s.right()), y1.max(s.top())],
        );

        let line = TextLine::new(self.to_page(rect), coalesce_spans(&spans));
        Some(LineInfo {
            line,
            baseline,
            x,
            font_size,
        })
    }

    /// Group lines into blocks (paragraphs) based on spacing.
    fn group_lines_into_blocks(&self, lines: Vec<LineInfo>) -> Vec<TextBlock> {
        let avg_spacing = calculate_avg_line_spacing(&lines);
        let mut blocks = Vec::new();
        let mut current: Vec<LineInfo> = Vec::new();

        for line in lines {
            if let Some(prev) = current.last() {
                if should_break_block(prev, &line, avg_spacing) {
                    blocks.push(make_block(std::mem::take(&mut current)));
                }
            }
            current.push(line);
        }
        if !current.is_empty() {
            blocks.push(make_block(current));
        }

        blocks
    }
}

/// Y-based line grouping for single-column layout.
fn group_spans_into_lines(mut spans: Vec<RawSpan>) -> Vec<Vec<RawSpan>> {
    // PDF y grows upward: read top to bottom, then left to right.
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<Vec<RawSpan>> = Vec::new();
    let mut current: Vec<RawSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let y_tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= y_tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Join runs that share a font and size into one span.
///
/// A space goes between runs when the gap exceeds a fifth of the average
/// glyph width, unless both sides are in a script without word spaces.
fn coalesce_spans(spans: &[RawSpan]) -> Vec<TextSpan> {
    let mut out: Vec<TextSpan> = Vec::new();
    let mut prev: Option<&RawSpan> = None;

    for span in spans {
        let text: String = span.text.nfc().collect();
        let same_style = prev.is_some_and(|p| {
            p.font_name == span.font_name && (p.font_size - span.font_size).abs() < 0.01
        });

        match (prev, out.last_mut()) {
            (Some(p), Some(last)) if same_style => {
                if needs_space(p, span) {
                    last.text.push(' ');
                }
                last.text.push_str(&text);
            }
            _ => {
                let flags = flags_from_font_name(&span.font_name);
                out.push(
                    TextSpan::new(text, span.font_size, span.font_name.clone()).with_flags(flags),
                );
            }
        }
        prev = Some(span);
    }

    out
}

fn needs_space(prev: &RawSpan, span: &RawSpan) -> bool {
    let chars = span.text.chars().count();
    let avg_char_width = if chars > 0 && span.width > 0.0 {
        span.width / chars as f32
    } else {
        span.font_size * 0.5
    };
    if span.x - prev.right() <= avg_char_width * 0.2 {
        return false;
    }

    let spaceless = prev.text.chars().last().is_some_and(is_spaceless_script_char)
        && span.text.chars().next().is_some_and(is_spaceless_script_char);
    let spaced = prev.text.ends_with([' ', '\u{00A0}']) || span.text.starts_with([' ', '\u{00A0}']);
    !spaceless && !spaced
}

/// Style flags implied by a font name.
pub(crate) fn flags_from_font_name(font_name: &str) -> SpanFlags {
    let name = font_name.to_lowercase();
    let mut flags = SpanFlags::empty();
    if ["bold", "black", "heavy"].iter().any(|w| name.contains(w)) {
        flags |= SpanFlags::BOLD;
    }
    if name.contains("italic") || name.contains("oblique") {
        flags |= SpanFlags::ITALIC;
    }
    if name.contains("courier") || name.contains("mono") {
        flags |= SpanFlags::MONOSPACED;
    }
    if (name.contains("times") || name.contains("serif")) && !name.contains("sans") {
        flags |= SpanFlags::SERIFED;
    }
    flags
}

fn calculate_avg_line_spacing(lines: &[LineInfo]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].baseline - w[1].baseline).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }
    spacings.iter().sum::<f32>() / spacings.len() as f32
}

/// Determine if a new block should start.
fn should_break_block(prev: &LineInfo, curr: &LineInfo, avg_spacing: f32) -> bool {
    // Large spacing indicates new paragraph
    (prev.baseline - curr.baseline).abs() > avg_spacing * 1.5
        // Significant font size change
        || (prev.font_size - curr.font_size).abs() > 1.0
        // Significant left margin change (indentation)
        || (prev.x - curr.x).abs() > 20.0
}

fn make_block(lines: Vec<LineInfo>) -> TextBlock {
    let bbox = lines
        .iter()
        .map(|l| l.line.bbox)
        .reduce(|a, b| a.union(&b))
        .unwrap_or_default();
    TextBlock::new(bbox, lines.into_iter().map(|l| l.line).collect())
}
