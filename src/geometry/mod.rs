pub mod boolean;
mod polygon;
mod polyline;
mod rect;
mod segment;

pub use polygon::Polygon;
pub use polyline::{MultiPoint, Polyline};
pub use rect::BoundingRect;
pub use segment::{segments_of, Segment};

use crate::math::Point2;

/// Discriminant of [`Geometry`], used for dispatch and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    Segment,
    Polyline,
    Polygon,
    MultiPoint,
}

/// Any planar geometry value.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point2),
    Segment(Segment),
    Polyline(Polyline),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
}

impl Geometry {
    /// Returns the kind tag of this geometry.
    #[must_use]
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Point(_) => GeometryKind::Point,
            Self::Segment(_) => GeometryKind::Segment,
            Self::Polyline(_) => GeometryKind::Polyline,
            Self::Polygon(_) => GeometryKind::Polygon,
            Self::MultiPoint(_) => GeometryKind::MultiPoint,
        }
    }

    /// Returns the bounding rectangle, or `None` for an empty geometry.
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingRect> {
        match self {
            Self::Point(p) => Some(BoundingRect::from_corners(*p, *p)),
            Self::Segment(s) => Some(s.bounds()),
            Self::Polyline(l) => l.bounds(),
            Self::Polygon(p) => p.bounds(),
            Self::MultiPoint(m) => m.bounds(),
        }
    }

    /// Returns every vertex of the geometry.
    #[must_use]
    pub fn vertices(&self) -> Vec<Point2> {
        match self {
            Self::Point(p) => vec![*p],
            Self::Segment(s) => vec![s.v1, s.v2],
            Self::Polyline(l) => l.vertices().copied().collect(),
            Self::Polygon(p) => p.vertices().copied().collect(),
            Self::MultiPoint(m) => m.points.clone(),
        }
    }
}

impl From<Point2> for Geometry {
    fn from(p: Point2) -> Self {
        Self::Point(p)
    }
}

impl From<Polyline> for Geometry {
    fn from(l: Polyline) -> Self {
        Self::Polyline(l)
    }
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Self::Polygon(p)
    }
}

impl From<MultiPoint> for Geometry {
    fn from(m: MultiPoint) -> Self {
        Self::MultiPoint(m)
    }
}
