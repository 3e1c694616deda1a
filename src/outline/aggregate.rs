//! Reassembly of headings that wrap across several text lines.

use serde::Serialize;

use crate::model::{BBox, Page};

use super::junk;
use super::region::{overlaps, ExcludedRegion, FILTER_MARGIN};

/// A line, or a run of joined lines, that may become a heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingCandidate {
    /// Text of the line or joined run
    pub text: String,
    /// Rounded size of the first span
    pub size: i32,
    /// Bounding box of the first line
    pub bbox: BBox,
    /// Whether the first line is bold or set in a heavy font
    pub bold: bool,
    /// Page number (1-indexed)
    pub page: u32,
}

/// Line aggregation thresholds.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Maximum gap between one line's bottom and the next line's top
    pub max_gap: f32,
    /// Maximum difference between rounded sizes
    pub max_size_diff: i32,
    /// Maximum difference between left edges
    pub max_x_shift: f32,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_gap: 8.0,
            max_size_diff: 1,
            max_x_shift: 15.0,
        }
    }
}

/// Collects heading candidates from a page and joins wrapped lines.
#[derive(Debug, Clone, Default)]
pub struct LineAggregator {
    config: AggregatorConfig,
}

impl LineAggregator {
    /// Create an aggregator with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator with custom thresholds.
    pub fn with_config(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Per-line candidates of a page, in reading order.
    ///
    /// Lines in excluded regions, junk lines and (on page 1) a line repeating
    /// a non-empty title are left out.
    pub fn line_candidates(
        &self,
        page: &Page,
        regions: &[ExcludedRegion],
        title: &str,
    ) -> Vec<HeadingCandidate> {
        let title = title.trim();
        let mut candidates = Vec::new();

        for line in page.lines() {
            let Some(size) = line.first_size() else {
                continue;
            };
            if overlaps(&line.bbox, regions, FILTER_MARGIN) {
                continue;
            }

            let text = line.text();
            if text.is_empty() || junk::is_junk(&text) {
                continue;
            }
            if page.number == 1 && !title.is_empty() && text == title {
                continue;
            }

            candidates.push(HeadingCandidate {
                text,
                size,
                bbox: line.bbox,
                bold: line.is_emphasized(),
                page: page.number,
            });
        }

        candidates
    }

    /// Join consecutive candidates that continue one another.
    ///
    /// Each run keeps the size, box and bold flag of its first line.
    pub fn aggregate(&self, lines: Vec<HeadingCandidate>) -> Vec<HeadingCandidate> {
        let mut runs = Vec::new();
        let mut lines = lines.into_iter();
        let Some(mut prev) = lines.next() else {
            return runs;
        };
        let mut run = prev.clone();

        for line in lines {
            if self.should_combine(&prev, &line) {
                run.text.push(' ');
                run.text.push_str(&line.text);
            } else {
                runs.push(std::mem::replace(&mut run, line.clone()));
            }
            prev = line;
        }
        runs.push(run);

        runs
    }

    /// Whether `next` continues the heading on `line`.
    pub fn should_combine(&self, line: &HeadingCandidate, next: &HeadingCandidate) -> bool {
        (next.bbox.y0 - line.bbox.y1).abs() <= self.config.max_gap
            && (line.size - next.size).abs() <= self.config.max_size_diff
            && (line.bbox.x0 - next.bbox.x0).abs() <= self.config.max_x_shift
    }
}
