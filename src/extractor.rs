//! Per-document outline extraction.
//!
//! [`OutlineExtractor`] drives one document through the pipeline:
//!
//! 1. probe the leading pages for native text and decide whether OCR is needed
//! 2. derive an OCR language string from a page-1 text sample
//! 3. load every page once (through OCR when scanned) with its excluded regions
//! 4. resolve the title
//! 5. build the font histogram and level map
//! 6. aggregate and classify heading candidates page by page
//!
//! Region and title failures degrade locally and are logged. Provider
//! failures while loading pages are returned to the caller.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::language::{detect_languages, ocr_language_string};
use crate::model::{Heading, OutlineResult, Page};
use crate::options::ExtractOptions;
use crate::outline::{
    DedupContext, ExcludedRegion, ExcludedRegionDetector, FontHistogram, FontLevels,
    HeadingClassifier, LineAggregator, TitleResolver,
};
use crate::provider::{LayoutProvider, LopdfProvider, OcrEngine};

/// Prefix of the title reported for a document that cannot be opened.
pub const OPEN_ERROR_PREFIX: &str = "Error opening PDF: ";

/// A page ready for analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedPage {
    /// Page layout (OCR output for scanned documents)
    pub page: Page,
    /// Merged excluded regions of the page
    pub regions: Vec<ExcludedRegion>,
}

/// Diagnostic view of a document, as the pipeline sees it.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    /// Number of pages
    pub page_count: u32,
    /// Whether OCR was used
    pub scanned: bool,
    /// OCR language string in effect, when scanned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_languages: Option<String>,
    /// Rounded size to span count, outside excluded regions
    pub font_histogram: Vec<(i32, usize)>,
    /// Body size and heading sizes, if any text was found
    pub levels: Option<FontLevels>,
    /// Excluded regions, one entry per page in order
    pub regions: Vec<Vec<ExcludedRegion>>,
}

/// Pages of a document after loading, plus how they were obtained.
struct Analysis {
    pages: Vec<AnalyzedPage>,
    scanned: bool,
    ocr_languages: Option<String>,
}

/// Extracts a title and heading outline from documents.
pub struct OutlineExtractor {
    options: ExtractOptions,
    regions: ExcludedRegionDetector,
    titles: TitleResolver,
    aggregator: LineAggregator,
    ocr: Option<Box<dyn OcrEngine + Send + Sync>>,
}

impl OutlineExtractor {
    /// Create an extractor with default options and no OCR engine.
    pub fn new() -> Self {
        Self::with_options(ExtractOptions::default())
    }

    /// Create an extractor with custom options.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self {
            regions: ExcludedRegionDetector::with_config(options.regions.clone()),
            titles: TitleResolver::with_config(options.title.clone()),
            aggregator: LineAggregator::with_config(options.aggregator.clone()),
            options,
            ocr: None,
        }
    }

    /// Attach an OCR engine for scanned documents.
    pub fn with_ocr<E>(mut self, engine: E) -> Self
    where
        E: OcrEngine + Send + Sync + 'static,
    {
        self.ocr = Some(Box::new(engine));
        self
    }

    /// Access the options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Open a PDF with the lopdf provider and extract its outline.
    ///
    /// A file that cannot be opened is not an error: the result carries
    /// `"Error opening PDF: <reason>"` as its title and no headings.
    pub fn extract_path<P: AsRef<Path>>(&self, path: P) -> Result<OutlineResult> {
        let path = path.as_ref();
        let provider = match LopdfProvider::open(path) {
            Ok(provider) => provider,
            Err(e) => {
                log::warn!("Could not open {}: {}", path.display(), e);
                return Ok(OutlineResult::title_only(format!("{}{}", OPEN_ERROR_PREFIX, e)));
            }
        };

        log::info!("Analyzing '{}'", path.display());
        self.extract(&provider)
    }

    /// Extract the outline of a document.
    pub fn extract<P: LayoutProvider>(&self, provider: &P) -> Result<OutlineResult> {
        let page_count = provider.page_count();
        if page_count == 0 {
            return Ok(OutlineResult::default());
        }

        let analysis = self.analyze(provider)?;
        let title = self.resolve_title(provider, &analysis.pages);

        let mut histogram = FontHistogram::new();
        for analyzed in &analysis.pages {
            histogram.add_page(&analyzed.page, &analyzed.regions);
        }
        let Some(levels) = histogram.analyze() else {
            log::info!("No sized text found; outline is empty");
            return Ok(OutlineResult::title_only(title));
        };
        log::debug!(
            "Body text size: {}, heading sizes: {:?}",
            levels.body_size,
            levels.heading_sizes
        );

        let outline = self.headings(&analysis.pages, levels, &title);
        log::info!(
            "Extracted {} heading(s) from {} page(s), title: '{}'",
            outline.len(),
            page_count,
            title
        );

        Ok(OutlineResult::new(title, outline))
    }

    /// Report the pipeline's intermediate state for a document.
    pub fn inspect<P: LayoutProvider>(&self, provider: &P) -> Result<Inspection> {
        let analysis = self.analyze(provider)?;

        let mut histogram = FontHistogram::new();
        for analyzed in &analysis.pages {
            histogram.add_page(&analyzed.page, &analyzed.regions);
        }

        Ok(Inspection {
            page_count: provider.page_count(),
            scanned: analysis.scanned,
            ocr_languages: analysis.ocr_languages,
            font_histogram: histogram.counts().iter().map(|(s, c)| (*s, *c)).collect(),
            levels: histogram.analyze(),
            regions: analysis.pages.into_iter().map(|p| p.regions).collect(),
        })
    }

    /// Whether none of the probed leading pages has native text.
    pub fn is_scanned<P: LayoutProvider>(&self, provider: &P) -> Result<bool> {
        let probe = provider.page_count().min(self.options.ocr_probe_pages);
        for number in 1..=probe {
            if provider.has_native_text(number)? {
                return Ok(false);
            }
        }
        Ok(probe > 0)
    }

    fn analyze<P: LayoutProvider>(&self, provider: &P) -> Result<Analysis> {
        let scanned = self.is_scanned(provider)?;
        let ocr_languages = if scanned {
            log::info!("Document appears to be scanned; OCR will be required");
            self.ocr_languages(provider)
        } else {
            None
        };

        let pages = (1..=provider.page_count())
            .map(|number| self.load_page(provider, number, ocr_languages.as_deref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Analysis {
            pages,
            scanned,
            ocr_languages,
        })
    }

    /// OCR language string for a scanned document, if OCR will run.
    fn ocr_languages<P: LayoutProvider>(&self, provider: &P) -> Option<String> {
        if !self.options.ocr_enabled || self.ocr.is_none() {
            log::warn!("Document appears to be scanned but OCR is not available");
            return None;
        }
        if let Some(languages) = &self.options.ocr_languages {
            return Some(languages.clone());
        }

        let sample = provider
            .text_sample(1, self.options.language_sample_chars)
            .unwrap_or_else(|e| {
                log::warn!("Could not sample page 1 text: {}", e);
                String::new()
            });
        let languages = detect_languages(&sample);
        log::info!("Detected languages: {:?}", languages);
        Some(ocr_language_string(&languages))
    }

    fn load_page<P: LayoutProvider>(
        &self,
        provider: &P,
        number: u32,
        ocr_languages: Option<&str>,
    ) -> Result<AnalyzedPage> {
        let native = provider.page(number)?;
        let page = match (ocr_languages, &self.ocr) {
            (Some(languages), Some(engine)) => match engine.recognize(&native, languages) {
                Ok(page) => page,
                Err(e) => {
                    log::warn!("OCR failed on page {}, using native text: {}", number, e);
                    native
                }
            },
            _ => native,
        };

        let regions = match self.page_regions(provider, &page) {
            Ok(regions) => regions,
            Err(e) => {
                log::warn!("{}", e);
                Vec::new()
            }
        };
        if !regions.is_empty() {
            log::debug!(
                "Found {} table/box area(s) on page {}",
                regions.len(),
                number
            );
        }

        Ok(AnalyzedPage { page, regions })
    }

    fn page_regions<P: LayoutProvider>(
        &self,
        provider: &P,
        page: &Page,
    ) -> Result<Vec<ExcludedRegion>> {
        let tables = provider.tables(page.number)?;
        let drawings = provider.drawings(page.number)?;
        Ok(self.regions.detect(page, &tables, &drawings))
    }

    fn resolve_title<P: LayoutProvider>(&self, provider: &P, pages: &[AnalyzedPage]) -> String {
        let resolved = provider.metadata().and_then(|metadata| {
            self.titles.resolve(&metadata, || {
                pages
                    .first()
                    .map(|first| (first.page.clone(), first.regions.clone()))
                    .ok_or_else(|| Error::TitleResolution("document has no pages".to_string()))
            })
        });

        match resolved {
            Ok(title) => title,
            Err(e) => {
                log::error!("Title extraction failed: {}", e);
                String::new()
            }
        }
    }

    fn headings(&self, pages: &[AnalyzedPage], levels: FontLevels, title: &str) -> Vec<Heading> {
        let classifier = HeadingClassifier::with_config(levels, self.options.classifier.clone());
        let mut dedup = DedupContext::new();
        let mut outline = Vec::new();

        for analyzed in pages {
            let lines = self
                .aggregator
                .line_candidates(&analyzed.page, &analyzed.regions, title);
            let runs = self.aggregator.aggregate(lines);
            let found = classifier.classify_all(&runs, &mut dedup);
            log::debug!(
                "Page {}: {} candidate run(s), {} heading(s)",
                analyzed.page.number,
                runs.len(),
                found.len()
            );
            outline.extend(found);
        }

        outline
    }
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OutlineExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutlineExtractor")
            .field("options", &self.options)
            .field("ocr", &self.ocr.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, SpanFlags, TextBlock, TextLine, TextSpan};
    use crate::provider::MemoryProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn line(text: &str, size: f32, y: f32) -> TextLine {
        let bbox = BBox::new(72.0, y, 400.0, y + size);
        TextLine::new(bbox, vec![TextSpan::new(text, size, "Times")])
    }

    fn page_with(number: u32, lines: Vec<TextLine>) -> Page {
        let mut page = Page::letter(number);
        for l in lines {
            page.add_block(TextBlock::new(l.bbox, vec![l]));
        }
        page
    }

    fn body(y: f32) -> TextLine {
        line("Body text that runs along the page", 11.0, y)
    }

    struct FixedOcr {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl OcrEngine for FixedOcr {
        fn recognize(&self, native: &Page, languages: &str) -> Result<Page> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(languages, "eng");
            if self.fail {
                return Err(Error::Ocr {
                    page: native.number,
                    reason: "engine crashed".to_string(),
                });
            }
            Ok(page_with(
                native.number,
                vec![line("Recognized Heading", 20.0, 100.0), body(200.0), body(220.0)],
            ))
        }
    }

    #[test]
    fn test_empty_document() {
        let result = OutlineExtractor::new().extract(&MemoryProvider::new()).unwrap();
        assert_eq!(result, OutlineResult::default());
    }

    #[test]
    fn test_metadata_title_and_headings() {
        let provider = MemoryProvider::new()
            .with_title("Annual Report")
            .with_page(page_with(
                1,
                vec![line("Introduction", 18.0, 100.0), body(140.0), body(160.0)],
            ));

        let result = OutlineExtractor::new().extract(&provider).unwrap();
        assert_eq!(result.title, "Annual Report");
        assert_eq!(result.outline, vec![Heading::new(1, "Introduction", 1)]);
    }

    #[test]
    fn test_no_sized_text_keeps_title() {
        let provider = MemoryProvider::new()
            .with_title("Blank")
            .with_page(Page::letter(1));
        let result = OutlineExtractor::new().extract(&provider).unwrap();
        assert_eq!(result, OutlineResult::title_only("Blank"));
    }

    #[test]
    fn test_region_failure_degrades() {
        let provider = MemoryProvider::new()
            .with_title("Doc")
            .with_page(page_with(
                1,
                vec![line("Scope", 16.0, 100.0), body(140.0), body(160.0)],
            ))
            .with_region_error(1, "drawing list unreadable");

        let result = OutlineExtractor::new().extract(&provider).unwrap();
        assert_eq!(result.outline, vec![Heading::new(1, "Scope", 1)]);
    }

    #[test]
    fn test_scanned_document_uses_ocr() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = MemoryProvider::new()
            .with_title("Scan")
            .with_page(Page::letter(1))
            .with_page(Page::letter(2));
        let extractor = OutlineExtractor::new().with_ocr(FixedOcr {
            calls: calls.clone(),
            fail: false,
        });

        assert!(extractor.is_scanned(&provider).unwrap());
        let result = extractor.extract(&provider).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // Same text on page 2 is deduplicated.
        assert_eq!(result.outline, vec![Heading::new(1, "Recognized Heading", 1)]);
    }

    #[test]
    fn test_ocr_failure_falls_back_to_native() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = MemoryProvider::new().with_page(Page::letter(1));
        let extractor = OutlineExtractor::new().with_ocr(FixedOcr {
            calls: calls.clone(),
            fail: true,
        });

        let result = extractor.extract(&provider).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result, OutlineResult::default());
    }

    #[test]
    fn test_native_text_skips_ocr() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = MemoryProvider::new()
            .with_page(Page::letter(1))
            .with_page(page_with(2, vec![body(100.0)]));
        let extractor = OutlineExtractor::new().with_ocr(FixedOcr {
            calls: calls.clone(),
            fail: false,
        });

        extractor.extract(&provider).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_inspect_reports_levels_and_regions() {
        let table = BBox::new(50.0, 400.0, 560.0, 500.0);
        let mut page = page_with(
            1,
            vec![line("Results", 14.0, 100.0), body(140.0), body(160.0)],
        );
        let bold = TextSpan::new("Quarter Totals", 14.0, "Times").with_flags(SpanFlags::BOLD);
        page.add_block(TextBlock::new(
            BBox::new(60.0, 420.0, 300.0, 434.0),
            vec![TextLine::new(BBox::new(60.0, 420.0, 300.0, 434.0), vec![bold])],
        ));
        let provider = MemoryProvider::new().with_regions(page, vec![table], Vec::new());

        let inspection = OutlineExtractor::new().inspect(&provider).unwrap();
        assert_eq!(inspection.page_count, 1);
        assert!(!inspection.scanned);
        assert_eq!(inspection.font_histogram, vec![(11, 2), (14, 1)]);
        let levels = inspection.levels.unwrap();
        assert_eq!(levels.body_size, 11);
        assert_eq!(levels.heading_sizes, vec![14]);
        assert_eq!(inspection.regions.len(), 1);
        assert_eq!(inspection.regions[0].len(), 1);
    }

    #[test]
    fn test_extract_path_open_error() {
        let result = OutlineExtractor::new()
            .extract_path("/nonexistent/missing.pdf")
            .unwrap();
        assert!(result.title.starts_with(OPEN_ERROR_PREFIX));
        assert!(result.is_empty());
    }

    #[test]
    fn test_extractor_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OutlineExtractor>();
    }
}
