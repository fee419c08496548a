use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::geometry::Segment;
use crate::math::Point2;

fn on_circle(center: &Point2, radius: f64, angle: f64) -> Point2 {
    Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Regular `points_per_circle`-gon of radius `radius` around `center`.
///
/// The first vertex lies at angle 0; vertices advance counter-clockwise.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn point_circle(center: &Point2, radius: f64, points_per_circle: usize) -> Vec<Point2> {
    let step = TAU / points_per_circle as f64;
    (0..points_per_circle)
        .map(|i| {
            let angle = i as f64 * step;
            on_circle(center, radius, angle)
        })
        .collect()
}

/// Half-circle from `from` to `from + PI` around `center`.
///
/// A full arc has `points_per_circle` points; a stub keeps only the two
/// extreme points.
#[allow(clippy::cast_precision_loss)]
fn half_arc(center: &Point2, radius: f64, from: f64, points_per_circle: usize, full: bool) -> Vec<Point2> {
    if !full || points_per_circle < 3 {
        return vec![
            on_circle(center, radius, from),
            on_circle(center, radius, from + PI),
        ];
    }
    let step = PI / (points_per_circle - 1) as f64;
    (0..points_per_circle)
        .map(|i| {
            let angle = from + i as f64 * step;
            on_circle(center, radius, angle)
        })
        .collect()
}

/// Direction angle of a segment whose endpoints satisfy `v1.x <= v2.x`
/// (lower to upper when vertical), in `[-PI/2, PI/2]`.
fn canonical_angle(v1: &Point2, v2: &Point2) -> f64 {
    let (dx, dy) = (v2.x - v1.x, v2.y - v1.y);
    if dx == 0.0 {
        FRAC_PI_2
    } else if dy == 0.0 {
        0.0
    } else {
        (dy / dx).abs().atan().copysign(dy)
    }
}

/// Capsule bounding `segment` at distance `radius`, as a counter-clockwise
/// ring.
///
/// With `both_sides` each end gets a full half-circle cap. Otherwise the end
/// at `segment.v1` (the joint with the previous segment of a path) gets a
/// two-point stub and only `segment.v2` is capped.
#[must_use]
pub fn segment_capsule(
    segment: &Segment,
    radius: f64,
    points_per_circle: usize,
    both_sides: bool,
) -> Vec<Point2> {
    let swapped = segment.v1.x > segment.v2.x
        || (segment.v1.x == segment.v2.x && segment.v1.y > segment.v2.y);
    let (v1, v2) = if swapped {
        (segment.v2, segment.v1)
    } else {
        (segment.v1, segment.v2)
    };
    let theta = canonical_angle(&v1, &v2);

    // The path-start end is v1 unless the endpoints were swapped.
    let full_at_v1 = both_sides || swapped;
    let full_at_v2 = both_sides || !swapped;

    let mut ring = half_arc(&v2, radius, theta - FRAC_PI_2, points_per_circle, full_at_v2);
    ring.extend(half_arc(&v1, radius, theta + FRAC_PI_2, points_per_circle, full_at_v1));
    ring
}
