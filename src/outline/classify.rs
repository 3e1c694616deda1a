//! Heading level assignment.
//!
//! A candidate is first tried against the font level map. When its size is
//! not a heading size, bold text at or above body size can still become a
//! heading one or two levels below the deepest size level.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Heading;

use super::aggregate::HeadingCandidate;
use super::fonts::FontLevels;

/// Percentages and currency amounts mark figures, not headings.
static FIGURE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+%|\$|₹").expect("figure pattern is valid"));

/// Texts already emitted as headings during one document run.
#[derive(Debug, Clone, Default)]
pub struct DedupContext {
    seen: HashSet<String>,
}

impl DedupContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the text has been emitted before.
    pub fn contains(&self, text: &str) -> bool {
        self.seen.contains(text)
    }

    /// Record an emitted text.
    pub fn insert(&mut self, text: impl Into<String>) {
        self.seen.insert(text.into());
    }

    /// Number of distinct texts emitted.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Classifier thresholds.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Word limit for size-mapped headings
    pub max_size_words: usize,
    /// Word limit for bold fallback headings
    pub max_bold_words: usize,
    /// Minimum heading length in characters
    pub min_chars: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_size_words: 20,
            max_bold_words: 15,
            min_chars: 3,
        }
    }
}

/// Assigns heading levels to aggregated candidates.
#[derive(Debug, Clone)]
pub struct HeadingClassifier {
    levels: FontLevels,
    config: ClassifierConfig,
}

impl HeadingClassifier {
    /// Create a classifier for a document's font levels.
    pub fn new(levels: FontLevels) -> Self {
        Self::with_config(levels, ClassifierConfig::default())
    }

    /// Create a classifier with custom thresholds.
    pub fn with_config(levels: FontLevels, config: ClassifierConfig) -> Self {
        Self { levels, config }
    }

    /// Font levels in use.
    pub fn levels(&self) -> &FontLevels {
        &self.levels
    }

    /// Classify one candidate, recording emitted text in `dedup`.
    ///
    /// Returns `None` for text already emitted or matching neither rule.
    pub fn classify(
        &self,
        candidate: &HeadingCandidate,
        dedup: &mut DedupContext,
    ) -> Option<Heading> {
        if dedup.contains(&candidate.text) {
            return None;
        }

        let level = self
            .size_level(candidate)
            .or_else(|| self.bold_level(candidate))?;

        dedup.insert(candidate.text.clone());
        Some(Heading::new(level, candidate.text.clone(), candidate.page))
    }

    /// Classify a page's candidates in order.
    pub fn classify_all(
        &self,
        candidates: &[HeadingCandidate],
        dedup: &mut DedupContext,
    ) -> Vec<Heading> {
        candidates
            .iter()
            .filter_map(|c| self.classify(c, dedup))
            .collect()
    }

    fn size_level(&self, candidate: &HeadingCandidate) -> Option<usize> {
        let level = self.levels.level_for(candidate.size)?;
        let words = candidate.text.split_whitespace().count();
        let long_enough = candidate.text.chars().count() >= self.config.min_chars;
        ((1..=self.config.max_size_words).contains(&words) && long_enough).then_some(level)
    }

    fn bold_level(&self, candidate: &HeadingCandidate) -> Option<usize> {
        let body = self.levels.body_size;
        if !candidate.bold || candidate.size < body {
            return None;
        }

        let text = &candidate.text;
        let words = text.split_whitespace().count();
        if !(1..=self.config.max_bold_words).contains(&words)
            || text.chars().count() < self.config.min_chars
            || text.ends_with('.')
            || FIGURE_PATTERN.is_match(text)
        {
            return None;
        }

        let deepest = self.levels.heading_size_count();
        let mut level = if candidate.size > body {
            deepest + 1
        } else {
            deepest + 2
        };
        // Body-size labels ending in a colon already land on the same level.
        if candidate.size == body && text.trim().ends_with(':') {
            level = deepest + 2;
        }
        Some(level)
    }
}
