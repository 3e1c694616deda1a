//! Extraction options and configuration.

use crate::outline::{AggregatorConfig, ClassifierConfig, RegionDetectorConfig, TitleConfig};

/// Options for outline extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Excluded-region detection thresholds
    pub regions: RegionDetectorConfig,

    /// Title selection thresholds
    pub title: TitleConfig,

    /// Line aggregation thresholds
    pub aggregator: AggregatorConfig,

    /// Heading classification thresholds
    pub classifier: ClassifierConfig,

    /// Number of leading pages probed for native text before OCR is used
    pub ocr_probe_pages: u32,

    /// Characters of page-1 text used for language detection
    pub language_sample_chars: usize,

    /// OCR language string to use instead of detection (e.g. "eng+fra")
    pub ocr_languages: Option<String>,

    /// Whether OCR is attempted at all when an engine is configured
    pub ocr_enabled: bool,
}

impl ExtractOptions {
    /// Create new extraction options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set region detection configuration.
    pub fn with_regions(mut self, config: RegionDetectorConfig) -> Self {
        self.regions = config;
        self
    }

    /// Set title configuration.
    pub fn with_title(mut self, config: TitleConfig) -> Self {
        self.title = config;
        self
    }

    /// Set aggregation configuration.
    pub fn with_aggregator(mut self, config: AggregatorConfig) -> Self {
        self.aggregator = config;
        self
    }

    /// Set classifier configuration.
    pub fn with_classifier(mut self, config: ClassifierConfig) -> Self {
        self.classifier = config;
        self
    }

    /// Set how many leading pages are probed for native text.
    pub fn with_ocr_probe_pages(mut self, pages: u32) -> Self {
        self.ocr_probe_pages = pages;
        self
    }

    /// Set the language detection sample length.
    pub fn with_language_sample(mut self, chars: usize) -> Self {
        self.language_sample_chars = chars;
        self
    }

    /// Force an OCR language string.
    pub fn with_ocr_languages(mut self, languages: impl Into<String>) -> Self {
        self.ocr_languages = Some(languages.into());
        self
    }

    /// Never run OCR, even for scanned documents.
    pub fn without_ocr(mut self) -> Self {
        self.ocr_enabled = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            regions: RegionDetectorConfig::default(),
            title: TitleConfig::default(),
            aggregator: AggregatorConfig::default(),
            classifier: ClassifierConfig::default(),
            ocr_probe_pages: 5,
            language_sample_chars: 1000,
            ocr_languages: None,
            ocr_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.ocr_probe_pages, 5);
        assert_eq!(options.language_sample_chars, 1000);
        assert!(options.ocr_languages.is_none());
        assert!(options.ocr_enabled);
        assert_eq!(options.regions.merge_margin, 8.0);
        assert_eq!(options.title.top_band, 0.4);
    }

    #[test]
    fn test_options_builder() {
        let options = ExtractOptions::new()
            .with_ocr_probe_pages(2)
            .with_ocr_languages("deu")
            .with_aggregator(AggregatorConfig {
                max_gap: 4.0,
                ..Default::default()
            })
            .without_ocr();

        assert_eq!(options.ocr_probe_pages, 2);
        assert_eq!(options.ocr_languages.as_deref(), Some("deu"));
        assert_eq!(options.aggregator.max_gap, 4.0);
        assert_eq!(options.aggregator.max_x_shift, 15.0);
        assert!(!options.ocr_enabled);
    }
}
