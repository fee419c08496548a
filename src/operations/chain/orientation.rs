use crate::error::{GeometryError, Result};
use crate::geometry::Segment;

/// Quadrant direction class shared by every segment of a monotone chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainOrientation {
    RightUp,
    RightDown,
    LeftUp,
    LeftDown,
}

/// Classifies the direction of `segment` (`v1` → `v2`).
///
/// The tie-breaks are asymmetric so that every non-degenerate direction,
/// including the four axis-aligned ones, falls in exactly one class:
///
/// | class       | x test         | y test         |
/// |-------------|----------------|----------------|
/// | `RightUp`   | `v1.x <= v2.x` | `v1.y <= v2.y` |
/// | `RightDown` | `v1.x <= v2.x` | `v1.y > v2.y`  |
/// | `LeftUp`    | `v1.x > v2.x`  | `v1.y < v2.y`  |
/// | `LeftDown`  | `v1.x > v2.x`  | `v1.y >= v2.y` |
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` if the endpoints are identical.
pub fn segment_orientation(segment: &Segment) -> Result<ChainOrientation> {
    let (a, b) = (&segment.v1, &segment.v2);
    if a == b {
        return Err(GeometryError::Degenerate(format!(
            "zero-length segment at ({}, {}) has no orientation",
            a.x, a.y
        ))
        .into());
    }
    let orientation = if a.x <= b.x {
        if a.y <= b.y {
            ChainOrientation::RightUp
        } else {
            ChainOrientation::RightDown
        }
    } else if a.y < b.y {
        ChainOrientation::LeftUp
    } else {
        ChainOrientation::LeftDown
    };
    Ok(orientation)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::PlanarError;
    use crate::math::Point2;

    fn orient(x1: f64, y1: f64, x2: f64, y2: f64) -> ChainOrientation {
        segment_orientation(&Segment::new(Point2::new(x1, y1), Point2::new(x2, y2))).unwrap()
    }

    #[test]
    fn quadrant_cases() {
        assert_eq!(orient(0.0, 0.0, 1.0, 1.0), ChainOrientation::RightUp);
        assert_eq!(orient(0.0, 0.0, 1.0, -1.0), ChainOrientation::RightDown);
        assert_eq!(orient(0.0, 0.0, -1.0, 1.0), ChainOrientation::LeftUp);
        assert_eq!(orient(0.0, 0.0, -1.0, -1.0), ChainOrientation::LeftDown);
    }

    #[test]
    fn axis_aligned_tie_breaks() {
        // Horizontal.
        assert_eq!(orient(0.0, 0.0, 1.0, 0.0), ChainOrientation::RightUp);
        assert_eq!(orient(1.0, 0.0, 0.0, 0.0), ChainOrientation::LeftDown);
        // Vertical.
        assert_eq!(orient(0.0, 0.0, 0.0, 1.0), ChainOrientation::RightUp);
        assert_eq!(orient(0.0, 1.0, 0.0, 0.0), ChainOrientation::RightDown);
    }

    #[test]
    fn degenerate_segment_fails() {
        let p = Point2::new(2.0, 3.0);
        let err = segment_orientation(&Segment::new(p, p)).unwrap_err();
        assert!(matches!(
            err,
            PlanarError::Geometry(GeometryError::Degenerate(_))
        ));
    }
}
