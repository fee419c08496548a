use super::distance_2d::point_to_line_dist;
use super::{points_equal, Point2, TOLERANCE};

/// Result of classifying two segments against each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    /// The segments do not meet.
    None,
    /// The segments meet in a single point.
    Point(Point2),
    /// The segments are collinear and share the sub-segment `(start, end)`.
    Overlap(Point2, Point2),
}

impl SegmentIntersection {
    /// Returns `true` unless the result is [`SegmentIntersection::None`].
    #[must_use]
    pub fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Tolerance-aware bounded segment-segment intersection.
///
/// Collinear segments (both endpoints of `b` within [`TOLERANCE`] of the line
/// through `a`) are reported as an overlap, or as a point when they only
/// touch. Intersection points within tolerance of an input endpoint snap to
/// that endpoint.
#[must_use]
pub fn segment_intersection(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> SegmentIntersection {
    let da = a1 - a0;
    let db = b1 - b0;
    let len_a = da.norm();
    let len_b = db.norm();
    if len_a < TOLERANCE || len_b < TOLERANCE {
        return degenerate_intersection(a0, a1, b0, b1, len_a, len_b);
    }

    let cross = da.x * db.y - da.y * db.x;
    if cross.abs() <= TOLERANCE * len_a * len_b {
        if point_to_line_dist(b0, a0, a1) <= TOLERANCE && point_to_line_dist(b1, a0, a1) <= TOLERANCE
        {
            return collinear_intersection(a0, a1, b0, b1);
        }
        return SegmentIntersection::None;
    }

    let w = b0 - a0;
    let t = (w.x * db.y - w.y * db.x) / cross;
    let u = (w.x * da.y - w.y * da.x) / cross;

    // Use a length-scaled epsilon to include endpoints.
    let eps_a = TOLERANCE / len_a;
    let eps_b = TOLERANCE / len_b;
    if t < -eps_a || t > 1.0 + eps_a || u < -eps_b || u > 1.0 + eps_b {
        return SegmentIntersection::None;
    }

    let pt = a0 + da * t.clamp(0.0, 1.0);
    SegmentIntersection::Point(snap_to_endpoint(pt, [a0, a1, b0, b1]))
}

/// Handles the case where one or both segments have (near) zero length.
fn degenerate_intersection(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
    len_a: f64,
    len_b: f64,
) -> SegmentIntersection {
    use super::distance_2d::point_to_segment_dist;

    match (len_a < TOLERANCE, len_b < TOLERANCE) {
        (true, true) if points_equal(a0, b0) => SegmentIntersection::Point(*a0),
        (true, false) if point_to_segment_dist(a0, b0, b1) <= TOLERANCE => {
            SegmentIntersection::Point(*a0)
        }
        (false, true) if point_to_segment_dist(b0, a0, a1) <= TOLERANCE => {
            SegmentIntersection::Point(*b0)
        }
        _ => SegmentIntersection::None,
    }
}

/// Intersects two segments already known to be collinear.
fn collinear_intersection(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> SegmentIntersection {
    let da = a1 - a0;
    let len_sq = da.norm_squared();
    let tb0 = (b0 - a0).dot(&da) / len_sq;
    let tb1 = (b1 - a0).dot(&da) / len_sq;

    let lo = tb0.min(tb1).max(0.0);
    let hi = tb0.max(tb1).min(1.0);
    let eps = TOLERANCE / len_sq.sqrt();

    if hi < lo - eps {
        return SegmentIntersection::None;
    }
    let ends = [a0, a1, b0, b1];
    let start = snap_to_endpoint(a0 + da * lo, ends);
    let end = snap_to_endpoint(a0 + da * hi.max(lo), ends);
    if points_equal(&start, &end) {
        SegmentIntersection::Point(start)
    } else {
        SegmentIntersection::Overlap(start, end)
    }
}

fn snap_to_endpoint(pt: Point2, ends: [&Point2; 4]) -> Point2 {
    ends.into_iter()
        .find(|e| points_equal(&pt, e))
        .copied()
        .unwrap_or(pt)
}
