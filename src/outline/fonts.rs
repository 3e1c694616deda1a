//! Document-wide font size statistics for heading level assignment.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{round_size, Page, TextLine};

use super::region::{overlaps, ExcludedRegion, FILTER_MARGIN};

/// Histogram of rounded span sizes across a document.
#[derive(Debug, Clone, Default)]
pub struct FontHistogram {
    /// Rounded size to span count
    size_histogram: BTreeMap<i32, usize>,
}

impl FontHistogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a font size observation. Sizes that round to zero or below are ignored.
    pub fn add_size(&mut self, size: f32) {
        let key = round_size(size);
        if key > 0 {
            *self.size_histogram.entry(key).or_insert(0) += 1;
        }
    }

    /// Count every span of a line.
    pub fn add_line(&mut self, line: &TextLine) {
        for span in &line.spans {
            self.add_size(span.size);
        }
    }

    /// Count every line of a page lying outside the excluded regions.
    pub fn add_page(&mut self, page: &Page, regions: &[ExcludedRegion]) {
        for line in page.lines() {
            if !overlaps(&line.bbox, regions, FILTER_MARGIN) {
                self.add_line(line);
            }
        }
    }

    /// Observed sizes with their counts, ascending by size.
    pub fn counts(&self) -> &BTreeMap<i32, usize> {
        &self.size_histogram
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.size_histogram.is_empty()
    }

    /// Derive body size and heading levels.
    ///
    /// Returns `None` for an empty histogram. The body size is the most
    /// frequent size; among equally frequent sizes the smallest wins.
    pub fn analyze(&self) -> Option<FontLevels> {
        // Ascending iteration plus strict comparison keeps the smallest size on ties.
        let mut body: Option<(i32, usize)> = None;
        for (&size, &count) in &self.size_histogram {
            if body.map_or(true, |(_, best)| count > best) {
                body = Some((size, count));
            }
        }
        let (body_size, _) = body?;

        let heading_sizes: Vec<i32> = self
            .size_histogram
            .keys()
            .rev()
            .copied()
            .filter(|size| *size > body_size)
            .collect();

        Some(FontLevels {
            body_size,
            heading_sizes,
        })
    }
}

/// Body size and the size-to-level map derived from a [`FontHistogram`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontLevels {
    /// Most common rounded size
    pub body_size: i32,
    /// Sizes larger than the body size, largest first
    pub heading_sizes: Vec<i32>,
}

impl FontLevels {
    /// Heading level (1-based) mapped to a size, if the size is a heading size.
    pub fn level_for(&self, size: i32) -> Option<usize> {
        self.heading_sizes
            .iter()
            .position(|s| *s == size)
            .map(|i| i + 1)
    }

    /// Number of distinct heading sizes.
    pub fn heading_size_count(&self) -> usize {
        self.heading_sizes.len()
    }
}
