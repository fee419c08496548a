use crate::math::polygon_2d::{open_ring, remove_collinear, weed_points};
use crate::math::Point2;

use super::boolean;
use super::segment::segments_of;
use super::{BoundingRect, Geometry, Segment};

/// A polygon stored as a set of rings.
///
/// Rings are kept open (no repeated closing vertex). Which rings are
/// exteriors and which are holes follows from their nesting, so callers may
/// supply them in any orientation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub rings: Vec<Vec<Point2>>,
}

impl Polygon {
    /// Creates a polygon from rings, dropping any repeated closing vertex.
    #[must_use]
    pub fn new(rings: Vec<Vec<Point2>>) -> Self {
        let rings = rings
            .into_iter()
            .map(|r| open_ring(&r).to_vec())
            .collect();
        Self { rings }
    }

    /// Returns `true` if the polygon has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(Vec::is_empty)
    }

    /// Returns the total number of vertices over all rings.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }

    /// Iterates every vertex of every ring.
    pub fn vertices(&self) -> impl Iterator<Item = &Point2> {
        self.rings.iter().flatten()
    }

    /// Iterates every ring edge, including each ring's closing edge.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.rings.iter().flat_map(|r| segments_of(r, true))
    }

    /// Returns the bounding rectangle, or `None` for an empty polygon.
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingRect> {
        BoundingRect::from_points(self.vertices())
    }

    /// Returns the covered area (holes subtracted).
    #[must_use]
    pub fn area(&self) -> f64 {
        boolean::area(&boolean::to_geo(self))
    }

    /// Returns `true` if `p` lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, p: &Point2) -> bool {
        boolean::intersects_point(&boolean::to_geo(self), p)
    }

    /// Removes vertices closer than `tolerance` to their predecessor, in place.
    ///
    /// Rings left with fewer than three vertices are dropped.
    pub fn weed(&mut self, tolerance: f64) {
        for ring in &mut self.rings {
            *ring = weed_points(ring, tolerance, true);
        }
        self.rings.retain(|r| r.len() >= 3);
    }

    /// Removes redundant (near-collinear) vertices from every ring, in place.
    pub fn simplify(&mut self) {
        for ring in &mut self.rings {
            *ring = remove_collinear(&boolean::simplify_ring(ring));
        }
    }

    /// Boolean union with `other`.
    ///
    /// The result set holds at most one polygon; it is empty when both inputs
    /// cover no area.
    #[must_use]
    pub fn union(&self, other: &Polygon) -> Vec<Geometry> {
        let merged = boolean::union_multi(&boolean::to_geo(self), &boolean::to_geo(other));
        into_set(boolean::from_geo(&merged))
    }

    /// Boolean difference `self - other`.
    #[must_use]
    pub fn difference(&self, other: &Polygon) -> Vec<Geometry> {
        let rest = boolean::difference_multi(&boolean::to_geo(self), &boolean::to_geo(other));
        into_set(boolean::from_geo(&rest))
    }
}

fn into_set(polygon: Polygon) -> Vec<Geometry> {
    if polygon.is_empty() {
        Vec::new()
    } else {
        vec![Geometry::Polygon(polygon)]
    }
}
