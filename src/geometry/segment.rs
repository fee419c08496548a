use crate::math::distance_2d::point_to_segment_dist;
use crate::math::intersect_2d::{segment_intersection, SegmentIntersection};
use crate::math::Point2;

use super::BoundingRect;

/// A directed straight segment from `v1` to `v2`.
///
/// Segments are plain values: anything that would alter one works on a copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub v1: Point2,
    pub v2: Point2,
}

impl Segment {
    /// Creates a segment between two points.
    #[must_use]
    pub fn new(v1: Point2, v2: Point2) -> Self {
        Self { v1, v2 }
    }

    /// Returns the Euclidean length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        nalgebra::distance(&self.v1, &self.v2)
    }

    /// Returns the axis-aligned bounding rectangle of the segment.
    #[must_use]
    pub fn bounds(&self) -> BoundingRect {
        BoundingRect::from_corners(self.v1, self.v2)
    }

    /// Classifies the intersection of this segment with `other`.
    #[must_use]
    pub fn intersection(&self, other: &Segment) -> SegmentIntersection {
        segment_intersection(&self.v1, &self.v2, &other.v1, &other.v2)
    }

    /// Returns the minimum distance from `p` to this segment.
    #[must_use]
    pub fn distance_to_point(&self, p: &Point2) -> f64 {
        point_to_segment_dist(p, &self.v1, &self.v2)
    }
}

/// Iterates the consecutive segments of a vertex run.
///
/// When `closed` is set the run's last vertex connects back to its first.
pub fn segments_of(points: &[Point2], closed: bool) -> impl Iterator<Item = Segment> + '_ {
    let n = points.len();
    let count = match (n, closed) {
        (0 | 1, _) => 0,
        (_, true) => n,
        (_, false) => n - 1,
    };
    (0..count).map(move |i| Segment::new(points[i], points[(i + 1) % n]))
}
