//! Heuristic title and heading detection.
//!
//! The pieces run in this order for each document:
//!
//! 1. [`ExcludedRegionDetector`] marks tables, drawn boxes and boxed prose
//!    on every page.
//! 2. [`TitleResolver`] picks the title from metadata or page 1.
//! 3. [`FontHistogram`] counts span sizes outside excluded regions over the
//!    whole document and yields [`FontLevels`].
//! 4. [`LineAggregator`] turns each page's lines into heading candidates.
//! 5. [`HeadingClassifier`] assigns levels and drops repeats.

pub mod aggregate;
pub mod classify;
pub mod excluded;
pub mod fonts;
pub mod junk;
pub mod region;
pub mod title;

pub use aggregate::{AggregatorConfig, HeadingCandidate, LineAggregator};
pub use classify::{ClassifierConfig, DedupContext, HeadingClassifier};
pub use excluded::{merge_regions, ExcludedRegionDetector, RegionDetectorConfig};
pub use fonts::{FontHistogram, FontLevels};
pub use junk::is_junk;
pub use region::{overlaps, ExcludedRegion, RegionKind, FILTER_MARGIN};
pub use title::{TitleCandidate, TitleConfig, TitleResolver};
