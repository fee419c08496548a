pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// Global geometric tolerance shared by every predicate, chain and graph.
///
/// The same value serves point equality, short-segment culling and
/// intersection robustness, so it is scale sensitive for very large or very
/// small coordinates.
pub const TOLERANCE: f64 = 1e-9;

/// Returns `true` if two points are within [`TOLERANCE`] of each other.
#[must_use]
pub fn points_equal(a: &Point2, b: &Point2) -> bool {
    nalgebra::distance_squared(a, b) <= TOLERANCE * TOLERANCE
}

/// Orders points horizontally: by X, then by Y.
#[must_use]
pub fn horizontal_cmp(a: &Point2, b: &Point2) -> std::cmp::Ordering {
    a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_equal_within_tolerance() {
        let a = Point2::new(1.0, 1.0);
        let b = Point2::new(1.0 + TOLERANCE * 0.5, 1.0);
        assert!(points_equal(&a, &b));
        assert!(!points_equal(&a, &Point2::new(1.0 + TOLERANCE * 2.0, 1.0)));
    }

    #[test]
    fn horizontal_order_breaks_ties_on_y() {
        let mut pts = vec![
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 5.0),
            Point2::new(1.0, -1.0),
        ];
        pts.sort_by(horizontal_cmp);
        assert_eq!(pts[0], Point2::new(0.0, 5.0));
        assert_eq!(pts[1], Point2::new(1.0, -1.0));
        assert_eq!(pts[2], Point2::new(1.0, 2.0));
    }
}
