use crate::math::polygon_2d::weed_points;
use crate::math::Point2;

use super::segment::segments_of;
use super::{BoundingRect, Segment};

/// A set of open paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    pub paths: Vec<Vec<Point2>>,
}

impl Polyline {
    /// Creates a polyline from its paths.
    #[must_use]
    pub fn new(paths: Vec<Vec<Point2>>) -> Self {
        Self { paths }
    }

    /// Returns the total number of vertices over all paths.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.paths.iter().map(Vec::len).sum()
    }

    /// Iterates every vertex of every path.
    pub fn vertices(&self) -> impl Iterator<Item = &Point2> {
        self.paths.iter().flatten()
    }

    /// Iterates every path segment.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.paths.iter().flat_map(|p| segments_of(p, false))
    }

    /// Returns the bounding rectangle, or `None` for an empty polyline.
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingRect> {
        BoundingRect::from_points(self.vertices())
    }

    /// Removes vertices closer than `tolerance` to their predecessor, in place.
    ///
    /// Path ends are preserved; empty paths are dropped.
    pub fn weed(&mut self, tolerance: f64) {
        for path in &mut self.paths {
            *path = weed_points(path, tolerance, false);
        }
        self.paths.retain(|p| !p.is_empty());
    }
}

/// A set of points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiPoint {
    pub points: Vec<Point2>,
}

impl MultiPoint {
    /// Creates a multipoint from its coordinates.
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Returns the bounding rectangle, or `None` when there are no points.
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingRect> {
        BoundingRect::from_points(&self.points)
    }
}
