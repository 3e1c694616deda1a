//! Excluded regions and the overlap test used to filter text against them.

use serde::{Deserialize, Serialize};

use crate::model::BBox;

/// Margin applied around regions when filtering headings and titles.
pub const FILTER_MARGIN: f32 = 2.0;

/// Where an excluded region came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// A table reported by table detection
    Table,
    /// A drawn rectangle
    Drawing,
    /// A text block that reads as boxed prose (callout, sidebar)
    BoxedText,
}

/// A page area whose text is ignored for title and heading purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedRegion {
    /// Area covered
    pub bbox: BBox,
    /// Provenance of the first contributing region
    pub kind: RegionKind,
}

impl ExcludedRegion {
    /// Create a region.
    pub fn new(bbox: BBox, kind: RegionKind) -> Self {
        Self { bbox, kind }
    }
}

/// Check whether `bbox` intersects any region grown by `margin`.
pub fn overlaps(bbox: &BBox, regions: &[ExcludedRegion], margin: f32) -> bool {
    regions
        .iter()
        .any(|region| bbox.intersects(&region.bbox.expand(margin)))
}
