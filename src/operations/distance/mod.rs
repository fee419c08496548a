use std::cmp::Ordering;

use tracing::debug;

use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::{boolean, Geometry, GeometryKind, Segment};
use crate::math::distance_2d::point_to_point_dist;
use crate::math::{horizontal_cmp, Point2, TOLERANCE};
use crate::operations::chain::{chains_for_geometry, MonotoneChain};

/// Computes the minimum Euclidean distance between two geometries.
///
/// Supports points, polylines, polygons and multipoints. A positive
/// `threshold` lets the search stop as soon as any candidate distance at or
/// below it is found; the returned value is then that candidate rather than
/// the exact minimum.
#[derive(Debug)]
pub struct EuclideanDistance<'a> {
    a: &'a Geometry,
    b: &'a Geometry,
    threshold: f64,
}

impl<'a> EuclideanDistance<'a> {
    /// Creates an unbounded distance query.
    #[must_use]
    pub fn new(a: &'a Geometry, b: &'a Geometry) -> Self {
        Self {
            a,
            b,
            threshold: 0.0,
        }
    }

    /// Sets the early-exit threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// - `OperationError::InvalidArgument` if the threshold is negative or NaN,
    ///   or if either geometry has no vertices
    /// - `GeometryError::UnsupportedGeometryType` for kinds other than point,
    ///   polyline, polygon and multipoint
    pub fn execute(&self) -> Result<f64> {
        if self.threshold.is_nan() || self.threshold < 0.0 {
            return Err(OperationError::InvalidArgument(format!(
                "distance threshold must be non-negative, got {}",
                self.threshold
            ))
            .into());
        }
        check_supported(self.a)?;
        check_supported(self.b)?;

        let (a, b) = canonical_order(self.a, self.b);
        let va = a.vertices();
        let vb = b.vertices();
        if va.is_empty() || vb.is_empty() {
            return Err(
                OperationError::InvalidArgument("distance to an empty geometry".to_owned()).into(),
            );
        }
        debug!(
            kind_a = ?a.kind(),
            kind_b = ?b.kind(),
            vertices_a = va.len(),
            vertices_b = vb.len(),
            threshold = self.threshold,
            "euclidean distance"
        );

        if vertex_inside_polygon(a, b, &vb) || vertex_inside_polygon(b, a, &va) {
            debug!("vertex inside polygon, distance is zero");
            return Ok(0.0);
        }

        let chains_a = reduced_chains(a, 0)?;
        let chains_b = reduced_chains(b, 1)?;
        if chains_cross(&chains_a, &chains_b) {
            debug!("chains cross, distance is zero");
            return Ok(0.0);
        }

        let mut best = f64::INFINITY;
        for (points, chains) in [(&va, &chains_b), (&vb, &chains_a)] {
            best = points_to_segments(points, chains, best, self.threshold);
            if best <= self.threshold {
                return Ok(best);
            }
        }
        Ok(points_to_points(&va, &vb, best, self.threshold))
    }
}

/// Distance between `a` and `b` with an early-exit `threshold`.
///
/// # Errors
///
/// See [`EuclideanDistance::execute`].
pub fn euclidean_distance(a: &Geometry, b: &Geometry, threshold: f64) -> Result<f64> {
    EuclideanDistance::new(a, b).with_threshold(threshold).execute()
}

/// Exact minimum distance between `a` and `b`.
///
/// # Errors
///
/// See [`EuclideanDistance::execute`].
pub fn minimum_euclidean_distance(a: &Geometry, b: &Geometry) -> Result<f64> {
    euclidean_distance(a, b, 0.0)
}

fn check_supported(g: &Geometry) -> Result<()> {
    match g.kind() {
        GeometryKind::Point
        | GeometryKind::Polyline
        | GeometryKind::Polygon
        | GeometryKind::MultiPoint => Ok(()),
        kind => Err(GeometryError::UnsupportedGeometryType {
            operation: "euclidean distance",
            kind,
        }
        .into()),
    }
}

/// Orders the operands independently of argument order, so early exits
/// visit candidates in the same sequence for `(a, b)` and `(b, a)`.
fn canonical_order<'g>(a: &'g Geometry, b: &'g Geometry) -> (&'g Geometry, &'g Geometry) {
    let rank = |g: &Geometry| match g.kind() {
        GeometryKind::Point => 0,
        GeometryKind::MultiPoint => 1,
        GeometryKind::Polyline => 2,
        GeometryKind::Polygon => 3,
        GeometryKind::Segment => 4,
    };
    let order = rank(a).cmp(&rank(b)).then_with(|| {
        let (va, vb) = (a.vertices(), b.vertices());
        va.len().cmp(&vb.len()).then_with(|| {
            va.iter()
                .zip(&vb)
                .map(|(p, q)| horizontal_cmp(p, q))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        })
    });
    if order == Ordering::Greater {
        (b, a)
    } else {
        (a, b)
    }
}

/// Returns `true` if `container` is a polygon whose rectangle meets the
/// other operand's and which holds one of `vertices`.
fn vertex_inside_polygon(container: &Geometry, other: &Geometry, vertices: &[Point2]) -> bool {
    let Geometry::Polygon(polygon) = container else {
        return false;
    };
    let (Some(ra), Some(rb)) = (container.bounds(), other.bounds()) else {
        return false;
    };
    if !ra.intersects(&rb) {
        return false;
    }
    let shape = boolean::to_geo(polygon);
    vertices
        .iter()
        .filter(|v| ra.contains_point(v))
        .any(|v| boolean::intersects_point(&shape, v))
}

fn reduced_chains(g: &Geometry, object_index: usize) -> Result<Vec<MonotoneChain>> {
    let mut chains = chains_for_geometry(g, object_index)?;
    for chain in &mut chains {
        chain.reduce_segments(TOLERANCE);
    }
    chains.retain(|c| !c.is_empty());
    Ok(chains)
}

fn chains_cross(a: &[MonotoneChain], b: &[MonotoneChain]) -> bool {
    a.iter()
        .any(|ca| b.iter().any(|cb| ca.bounds_intersect(cb) && ca.crosses_with(cb)))
}

/// Minimum distance from any point to any chain segment, pruned by an
/// X window of the running minimum.
fn points_to_segments(
    points: &[Point2],
    chains: &[MonotoneChain],
    mut best: f64,
    threshold: f64,
) -> f64 {
    let mut segments: Vec<(f64, f64, Segment)> = chains
        .iter()
        .flat_map(MonotoneChain::segments)
        .map(|s| (s.v1.x.min(s.v2.x), s.v1.x.max(s.v2.x), *s))
        .collect();
    if segments.is_empty() {
        return best;
    }
    segments.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut sorted: Vec<Point2> = points.to_vec();
    sorted.sort_by(horizontal_cmp);

    for p in &sorted {
        for (min_x, max_x, seg) in &segments {
            if min_x - p.x > best {
                break;
            }
            if p.x - max_x > best {
                continue;
            }
            let d = seg.distance_to_point(p);
            if d < best {
                best = d;
                if best <= threshold {
                    return best;
                }
            }
        }
    }
    best
}

/// Minimum pairwise point distance, scanning a sorted X window.
fn points_to_points(a: &[Point2], b: &[Point2], mut best: f64, threshold: f64) -> f64 {
    let mut sorted_a = a.to_vec();
    sorted_a.sort_by(horizontal_cmp);
    let mut sorted_b = b.to_vec();
    sorted_b.sort_by(horizontal_cmp);

    for p in &sorted_a {
        let start = sorted_b.partition_point(|q| q.x < p.x - best);
        for q in &sorted_b[start..] {
            if q.x - p.x > best {
                break;
            }
            let d = point_to_point_dist(p, q);
            if d < best {
                best = d;
                if best <= threshold {
                    return best;
                }
            }
        }
    }
    best
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::PlanarError;
    use crate::geometry::{segments_of, MultiPoint, Polygon, Polyline};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square(x0: f64, y0: f64, size: f64) -> Geometry {
        Geometry::Polygon(Polygon::new(vec![vec![
            p(x0, y0),
            p(x0 + size, y0),
            p(x0 + size, y0 + size),
            p(x0, y0 + size),
        ]]))
    }

    fn triangle() -> Geometry {
        Geometry::Polygon(Polygon::new(vec![vec![p(5.0, 1.0), p(8.0, 0.5), p(6.5, 4.0)]]))
    }

    fn zigzag() -> Geometry {
        Geometry::Polyline(Polyline::new(vec![vec![
            p(-3.0, -2.0),
            p(-1.0, 1.0),
            p(0.5, -1.5),
            p(2.0, -1.0),
        ]]))
    }

    fn samples() -> Vec<Geometry> {
        vec![
            Geometry::Point(p(3.0, 3.0)),
            Geometry::MultiPoint(MultiPoint::new(vec![p(-2.0, 5.0), p(4.0, -3.0)])),
            zigzag(),
            square(0.0, 0.0, 2.0),
            triangle(),
        ]
    }

    fn brute_force(a: &[Point2], b: &[Point2]) -> f64 {
        let mut best = f64::INFINITY;
        for s in segments_of(b, true) {
            for v in a {
                best = best.min(s.distance_to_point(v));
            }
        }
        for s in segments_of(a, true) {
            for v in b {
                best = best.min(s.distance_to_point(v));
            }
        }
        best
    }

    #[test]
    fn self_distance_is_zero() {
        for g in samples() {
            assert_abs_diff_eq!(minimum_euclidean_distance(&g, &g).unwrap(), 0.0);
        }
    }

    #[test]
    fn symmetric_for_all_pairs_and_thresholds() {
        crate::testing::init_tracing();
        let geoms = samples();
        for a in &geoms {
            for b in &geoms {
                for t in [0.0, 0.5, 3.0, 100.0] {
                    let ab = euclidean_distance(a, b, t).unwrap();
                    let ba = euclidean_distance(b, a, t).unwrap();
                    assert!((ab - ba).abs() < 1e-12, "{a:?} vs {b:?} at {t}: {ab} != {ba}");
                }
            }
        }
    }

    #[test]
    fn disjoint_convex_polygons_match_brute_force() {
        let a = square(0.0, 0.0, 2.0);
        let b = triangle();
        let d = minimum_euclidean_distance(&a, &b).unwrap();
        let expected = brute_force(&a.vertices(), &b.vertices());
        assert_abs_diff_eq!(d, expected, epsilon = 1e-12);
        assert_abs_diff_eq!(d, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn point_inside_polygon_is_zero() {
        let d = minimum_euclidean_distance(&Geometry::Point(p(1.0, 1.0)), &square(0.0, 0.0, 2.0))
            .unwrap();
        assert_abs_diff_eq!(d, 0.0);
    }

    #[test]
    fn crossing_lines_are_zero() {
        let a = Geometry::Polyline(Polyline::new(vec![vec![p(0.0, 0.0), p(4.0, 4.0)]]));
        let b = Geometry::Polyline(Polyline::new(vec![vec![p(0.0, 4.0), p(4.0, 0.0)]]));
        assert_abs_diff_eq!(minimum_euclidean_distance(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn point_to_line() {
        let line = Geometry::Polyline(Polyline::new(vec![vec![p(0.0, 0.0), p(10.0, 0.0)]]));
        let d = minimum_euclidean_distance(&Geometry::Point(p(4.0, 3.0)), &line).unwrap();
        assert_abs_diff_eq!(d, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn point_to_point_and_multipoint() {
        let a = Geometry::Point(p(0.0, 0.0));
        let b = Geometry::MultiPoint(MultiPoint::new(vec![p(10.0, 0.0), p(3.0, 4.0), p(-8.0, 0.0)]));
        assert_abs_diff_eq!(minimum_euclidean_distance(&a, &b).unwrap(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn threshold_allows_early_exit_at_or_below_it() {
        let a = Geometry::Point(p(0.0, 0.0));
        let b = Geometry::MultiPoint(MultiPoint::new(vec![p(3.0, 4.0), p(1.0, 0.0)]));
        let d = euclidean_distance(&a, &b, 10.0).unwrap();
        assert!(d <= 10.0);
        assert!(d >= 1.0);
    }

    #[test]
    fn negative_threshold_fails() {
        let a = Geometry::Point(p(0.0, 0.0));
        let err = euclidean_distance(&a, &a, -1.0).unwrap_err();
        assert!(matches!(
            err,
            PlanarError::Operation(OperationError::InvalidArgument(_))
        ));
    }

    #[test]
    fn unsupported_kind_fails() {
        let a = Geometry::Segment(Segment::new(p(0.0, 0.0), p(1.0, 0.0)));
        let b = Geometry::Point(p(0.0, 0.0));
        let err = minimum_euclidean_distance(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            PlanarError::Geometry(GeometryError::UnsupportedGeometryType { .. })
        ));
    }
}
