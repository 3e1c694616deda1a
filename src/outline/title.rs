//! Document title resolution.
//!
//! The metadata title wins when it is short and non-empty. Otherwise the
//! first page is scanned for large text near the top that reads like a
//! title rather than a sentence.

use crate::error::Result;
use crate::model::{DocumentMetadata, Page};

use super::junk;
use super::region::{overlaps, ExcludedRegion, FILTER_MARGIN};

/// Prefixes of captions and page furniture that never make a title.
const CAPTION_PREFIXES: [&str; 3] = ["page ", "figure ", "table "];

/// Title resolver configuration.
#[derive(Debug, Clone)]
pub struct TitleConfig {
    /// Metadata titles must be shorter than this many characters
    pub max_metadata_chars: usize,
    /// Only lines whose top lies in this fraction of the page are candidates
    pub top_band: f32,
    /// Candidate text length bounds (characters, inclusive)
    pub min_chars: usize,
    /// Upper candidate length bound
    pub max_chars: usize,
    /// Preferred titles have at least this many words
    pub min_words: usize,
    /// Preferred titles have at most this many words
    pub max_words: usize,
    /// Preferred titles have at least this many characters
    pub min_preferred_chars: usize,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            max_metadata_chars: 100,
            top_band: 0.4,
            min_chars: 3,
            max_chars: 200,
            min_words: 3,
            max_words: 20,
            min_preferred_chars: 10,
        }
    }
}

/// A first-page line considered for the title.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleCandidate {
    /// Line text
    pub text: String,
    /// Rounded size of the first span
    pub font_size: i32,
    /// Top edge as a fraction of page height
    pub position: f32,
    /// Length in characters
    pub length: usize,
}

/// Picks the document title.
#[derive(Debug, Clone, Default)]
pub struct TitleResolver {
    config: TitleConfig,
}

impl TitleResolver {
    /// Create a resolver with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver with custom configuration.
    pub fn with_config(config: TitleConfig) -> Self {
        Self { config }
    }

    /// Resolve the title.
    ///
    /// `first_page` is only invoked when metadata carries no usable title;
    /// it yields page 1 and its excluded regions. Any error it returns is
    /// passed through for the caller to apply its fallback.
    pub fn resolve<F>(&self, metadata: &DocumentMetadata, first_page: F) -> Result<String>
    where
        F: FnOnce() -> Result<(Page, Vec<ExcludedRegion>)>,
    {
        if let Some(title) = metadata.usable_title(self.config.max_metadata_chars) {
            return Ok(title.to_string());
        }

        let (page, regions) = first_page()?;
        let candidates = self.candidates(&page, &regions);
        Ok(self.select(&candidates).unwrap_or_default())
    }

    /// Ranked title candidates from a first page.
    ///
    /// Sorted by font size descending, then by position from the top.
    pub fn candidates(&self, page: &Page, regions: &[ExcludedRegion]) -> Vec<TitleCandidate> {
        let mut candidates = Vec::new();

        for line in page.lines() {
            let Some(font_size) = line.first_size() else {
                continue;
            };

            let position = if page.height > 0.0 {
                line.bbox.y0 / page.height
            } else {
                0.0
            };
            if overlaps(&line.bbox, regions, FILTER_MARGIN) || position > self.config.top_band {
                continue;
            }

            let text = line.text();
            let length = text.chars().count();
            if length < self.config.min_chars
                || length > self.config.max_chars
                || junk::matches_pattern(&text)
            {
                continue;
            }
            let lowered = text.to_lowercase();
            if CAPTION_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
                continue;
            }

            candidates.push(TitleCandidate {
                text,
                font_size,
                position,
                length,
            });
        }

        candidates.sort_by(|a, b| {
            b.font_size
                .cmp(&a.font_size)
                .then(a.position.total_cmp(&b.position))
        });
        candidates
    }

    /// First candidate that reads like a title, else the top-ranked one.
    pub fn select(&self, candidates: &[TitleCandidate]) -> Option<String> {
        candidates
            .iter()
            .find(|c| self.reads_like_title(c))
            .or_else(|| candidates.first())
            .map(|c| c.text.clone())
    }

    fn reads_like_title(&self, candidate: &TitleCandidate) -> bool {
        let words = candidate.text.split_whitespace().count();
        (self.config.min_words..=self.config.max_words).contains(&words)
            && !candidate.text.ends_with('.')
            && candidate.length >= self.config.min_preferred_chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{BBox, TextBlock, TextLine, TextSpan};
    use crate::outline::region::RegionKind;

    fn page(lines: &[(&str, f32, f32)]) -> Page {
        let mut page = Page::new(1, 600.0, 800.0);
        for (text, size, top) in lines {
            let bbox = BBox::new(50.0, *top, 550.0, top + size);
            page.add_block(TextBlock::new(
                bbox,
                vec![TextLine::new(bbox, vec![TextSpan::new(*text, *size, "Times")])],
            ));
        }
        page
    }

    #[test]
    fn test_metadata_title_wins() {
        let resolver = TitleResolver::new();
        let meta = DocumentMetadata::with_title("  Quarterly Review ");
        let title = resolver
            .resolve(&meta, || panic!("layout must not be consulted"))
            .unwrap();
        assert_eq!(title, "Quarterly Review");
    }

    #[test]
    fn test_largest_top_line_wins() {
        let resolver = TitleResolver::new();
        let page = page(&[
            ("Annual Community Garden Report", 24.0, 60.0),
            ("Prepared for the board of directors", 14.0, 100.0),
        ]);
        let title = resolver
            .resolve(&DocumentMetadata::default(), || Ok((page, Vec::new())))
            .unwrap();
        assert_eq!(title, "Annual Community Garden Report");
    }

    #[test]
    fn test_sentence_skipped_for_title_like_line() {
        let resolver = TitleResolver::new();
        let page = page(&[
            ("This is a big sentence.", 30.0, 40.0),
            ("Guide to Local Birds", 20.0, 80.0),
        ]);
        let candidates = resolver.candidates(&page, &[]);
        assert_eq!(candidates.len(), 2);
        assert_eq!(
            resolver.select(&candidates),
            Some("Guide to Local Birds".to_string())
        );
    }

    #[test]
    fn test_fallback_to_top_ranked_verbatim() {
        let resolver = TitleResolver::new();
        let page = page(&[("RFP", 28.0, 40.0), ("Draft", 12.0, 80.0)]);
        let candidates = resolver.candidates(&page, &[]);
        assert_eq!(resolver.select(&candidates), Some("RFP".to_string()));
    }

    #[test]
    fn test_candidates_filtered() {
        let resolver = TitleResolver::new();
        let page = page(&[
            ("Page 1", 30.0, 20.0),
            ("Figure 2 shows the layout", 30.0, 30.0),
            ("Below the Fold Heading", 30.0, 500.0),
            ("Boxed Call To Action", 30.0, 150.0),
            ("Real Document Title", 18.0, 60.0),
        ]);
        let regions = vec![ExcludedRegion::new(
            BBox::new(40.0, 140.0, 560.0, 200.0),
            RegionKind::Drawing,
        )];
        let candidates = resolver.candidates(&page, &regions);
        let texts: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Real Document Title"]);
    }

    #[test]
    fn test_ties_broken_toward_top() {
        let resolver = TitleResolver::new();
        let page = page(&[
            ("Second Line Of Title", 20.0, 120.0),
            ("First Line Of Title", 20.0, 60.0),
        ]);
        let candidates = resolver.candidates(&page, &[]);
        assert_eq!(candidates[0].text, "First Line Of Title");
    }

    #[test]
    fn test_no_candidates_is_empty_title() {
        let resolver = TitleResolver::new();
        let title = resolver
            .resolve(&DocumentMetadata::default(), || {
                Ok((Page::letter(1), Vec::new()))
            })
            .unwrap();
        assert_eq!(title, "");
    }

    #[test]
    fn test_first_page_error_propagates() {
        let resolver = TitleResolver::new();
        let result = resolver.resolve(&DocumentMetadata::default(), || {
            Err(Error::TitleResolution("no first page".to_string()))
        });
        assert!(result.is_err());
    }
}
