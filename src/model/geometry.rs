//! Page-space geometry.
//!
//! All boxes use top-down page coordinates: `y0` is the top edge and grows
//! towards the bottom of the page, matching how layout providers report
//! blocks and lines.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box `(x0, y0, x1, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a bounding box from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a bounding box from an origin and a size.
    pub fn from_origin(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// A box with zero or negative extent on either axis.
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Grow the box by `margin` on every side.
    pub fn expand(&self, margin: f32) -> Self {
        Self::new(
            self.x0 - margin,
            self.y0 - margin,
            self.x1 + margin,
            self.y1 + margin,
        )
    }

    /// Interior intersection test.
    ///
    /// Boxes that only touch along an edge do not intersect, and empty boxes
    /// intersect nothing.
    pub fn intersects(&self, other: &BBox) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &BBox) -> bool {
        other.x0 >= self.x0 && other.y0 >= self.y0 && other.x1 <= self.x1 && other.y1 <= self.y1
    }

    /// Smallest box covering both boxes.
    pub fn union(&self, other: &BBox) -> Self {
        Self::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }
}

impl From<[f32; 4]> for BBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_dimensions() {
        let b = BBox::from_origin(10.0, 20.0, 100.0, 50.0);
        assert_eq!(b.width(), 100.0);
        assert_eq!(b.height(), 50.0);
        assert_eq!(b.x1, 110.0);
        assert!(!b.is_empty());
    }

    #[test]
    fn test_bbox_intersects() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(5.0, 5.0, 15.0, 15.0);
        let c = BBox::new(10.0, 0.0, 20.0, 10.0);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        // Shared edge only
        assert!(!a.intersects(&c));
        assert!(a.expand(1.0).intersects(&c));
    }

    #[test]
    fn test_bbox_empty_never_intersects() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let empty = BBox::new(5.0, 5.0, 5.0, 5.0);
        assert!(!a.intersects(&empty));
    }

    #[test]
    fn test_bbox_union_and_contains() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(20.0, 5.0, 30.0, 40.0);
        let u = a.union(&b);

        assert_eq!(u, BBox::new(0.0, 0.0, 30.0, 40.0));
        assert!(u.contains(&a));
        assert!(u.contains(&b));
        assert!(!a.contains(&u));
    }
}
