//! Excluded-region detection.
//!
//! Collects tables, drawn rectangles and "boxed prose" blocks on a page and
//! merges them into a set of disjoint regions. Text inside those regions is
//! never considered for the title or the outline.

use crate::model::{BBox, Page, TextBlock};

use super::region::{ExcludedRegion, RegionKind};

/// Block prefixes that mark callout/sidebar content.
const BOX_LABELS: [&str; 13] = [
    "mission statement:",
    "goals:",
    "objectives:",
    "summary:",
    "abstract:",
    "note:",
    "important:",
    "warning:",
    "caution:",
    "definition:",
    "example:",
    "key points:",
    "highlights:",
];

/// Words that make a short block read as a section heading.
const SECTION_WORDS: [&str; 5] = ["pathway", "options", "section", "chapter", "part"];

/// Bullet glyphs that suggest a boxed list.
const BULLETS: [char; 2] = ['•', '●'];

/// Region detector configuration.
#[derive(Debug, Clone)]
pub struct RegionDetectorConfig {
    /// Drawings must be wider than this to count
    pub min_drawing_width: f32,
    /// Drawings must be taller than this to count
    pub min_drawing_height: f32,
    /// Two regions closer than this are merged
    pub merge_margin: f32,
    /// Padding added around boxed text blocks
    pub boxed_padding: f32,
    /// Margin around a drawing when testing block containment
    pub containment_margin: f32,
    /// First-line indent (fraction of page width) required for boxed prose
    pub min_indent_ratio: f32,
    /// Block width (fraction of page width) below which prose may be boxed
    pub max_width_ratio: f32,
    /// Two blocks share an indentation level within this distance
    pub indent_tolerance: f32,
    /// Boxed prose needs more words than this
    pub min_boxed_words: usize,
    /// Boxed prose needs more characters than this
    pub min_boxed_chars: usize,
}

impl Default for RegionDetectorConfig {
    fn default() -> Self {
        Self {
            min_drawing_width: 30.0,
            min_drawing_height: 15.0,
            merge_margin: 8.0,
            boxed_padding: 3.0,
            containment_margin: 5.0,
            min_indent_ratio: 0.08,
            max_width_ratio: 0.85,
            indent_tolerance: 15.0,
            min_boxed_words: 10,
            min_boxed_chars: 100,
        }
    }
}

/// Detects excluded regions on a page.
#[derive(Debug, Clone, Default)]
pub struct ExcludedRegionDetector {
    config: RegionDetectorConfig,
}

impl ExcludedRegionDetector {
    /// Create a detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector with custom configuration.
    pub fn with_config(config: RegionDetectorConfig) -> Self {
        Self { config }
    }

    /// Access the configuration.
    pub fn config(&self) -> &RegionDetectorConfig {
        &self.config
    }

    /// Build the merged region set for a page.
    ///
    /// `tables` and `drawings` come from the layout provider; drawings below
    /// the minimum size are ignored.
    pub fn detect(&self, page: &Page, tables: &[BBox], drawings: &[BBox]) -> Vec<ExcludedRegion> {
        let rects: Vec<BBox> = drawings
            .iter()
            .filter(|r| {
                r.width() > self.config.min_drawing_width
                    && r.height() > self.config.min_drawing_height
            })
            .copied()
            .collect();

        let mut candidates: Vec<ExcludedRegion> = tables
            .iter()
            .map(|t| ExcludedRegion::new(*t, RegionKind::Table))
            .collect();
        candidates.extend(
            rects
                .iter()
                .map(|r| ExcludedRegion::new(*r, RegionKind::Drawing)),
        );

        for (idx, block) in page.blocks.iter().enumerate() {
            if !block.is_text() {
                continue;
            }
            if self.is_boxed(page, idx, block, &rects) {
                log::debug!(
                    "page {}: block {} classified as boxed text",
                    page.number,
                    idx
                );
                candidates.push(ExcludedRegion::new(
                    block.bbox.expand(self.config.boxed_padding),
                    RegionKind::BoxedText,
                ));
            }
        }

        merge_regions(candidates, self.config.merge_margin)
    }

    /// Decide whether a text block reads as boxed prose.
    fn is_boxed(&self, page: &Page, idx: usize, block: &TextBlock, rects: &[BBox]) -> bool {
        let text = block_text(block);
        let words: Vec<&str> = text.split_whitespace().collect();
        let char_count = text.chars().count();

        if looks_like_heading(&text, &words) {
            return false;
        }

        let lowered = text.to_lowercase();
        if BOX_LABELS.iter().any(|label| lowered.starts_with(label)) {
            return true;
        }

        if words.len() > self.config.min_boxed_words && char_count > self.config.min_boxed_chars
        {
            let Some(first_x) = block.first_line_x() else {
                return false;
            };
            let indented = first_x > page.width * self.config.min_indent_ratio;
            let narrow = block.bbox.width() < page.width * self.config.max_width_ratio;
            if !(indented && narrow) {
                return false;
            }

            let framed = rects.iter().any(|rect| {
                rect.expand(self.config.containment_margin)
                    .contains(&block.bbox)
                    || rect.intersects(&block.bbox)
            });
            if framed {
                return true;
            }

            // A lone block at its indentation level is treated as boxed.
            let similar = page
                .blocks
                .iter()
                .enumerate()
                .filter(|(other_idx, other)| *other_idx != idx && !other.lines.is_empty())
                .filter_map(|(_, other)| other.first_line_x())
                .filter(|x| (x - first_x).abs() < self.config.indent_tolerance)
                .count();
            return similar <= 1;
        }

        let line_breaks = block.raw_text().trim().matches('\n').count();
        if text.contains(BULLETS) || line_breaks > 2 {
            return rects.iter().any(|rect| rect.intersects(&block.bbox));
        }

        false
    }
}

/// Span texts of a block joined with single spaces.
fn block_text(block: &TextBlock) -> String {
    block
        .lines
        .iter()
        .flat_map(|l| l.spans.iter())
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Short all-caps blocks or blocks naming a section are kept as headings.
fn looks_like_heading(text: &str, words: &[&str]) -> bool {
    if words.len() > 5 || text.chars().count() >= 50 {
        return false;
    }
    is_all_caps(text)
        || words
            .iter()
            .any(|w| SECTION_WORDS.contains(&w.to_lowercase().as_str()))
}

/// At least one cased letter and no lowercase letters.
fn is_all_caps(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Merge regions into a disjoint set.
///
/// Regions are sorted by top edge then left edge and folded left: each region
/// is unioned into the first accumulated region whose `margin` expansion
/// intersects it, otherwise it starts a new one. The fold repeats until a
/// pass performs no merge, so the result does not depend on input order.
pub fn merge_regions(mut regions: Vec<ExcludedRegion>, margin: f32) -> Vec<ExcludedRegion> {
    loop {
        regions.sort_by(|a, b| {
            a.bbox
                .y0
                .total_cmp(&b.bbox.y0)
                .then(a.bbox.x0.total_cmp(&b.bbox.x0))
        });

        let input_len = regions.len();
        let mut merged: Vec<ExcludedRegion> = Vec::with_capacity(input_len);
        for region in regions {
            match merged
                .iter_mut()
                .find(|acc| acc.bbox.expand(margin).intersects(&region.bbox))
            {
                Some(acc) => acc.bbox = acc.bbox.union(&region.bbox),
                None => merged.push(region),
            }
        }

        if merged.len() == input_len {
            return merged;
        }
        regions = merged;
    }
}
