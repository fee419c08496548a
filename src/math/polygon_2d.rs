use super::{Point2, TOLERANCE};

/// Computes the signed area of a ring (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. A repeated
/// closing vertex contributes nothing.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Removes vertices that lie closer than `tolerance` to the previously kept
/// vertex.
///
/// For closed rings the last kept vertex is also compared against the first,
/// so the ring never ends on a near-duplicate of its start. The first vertex
/// of an open path and its last vertex are always kept.
#[must_use]
pub fn weed_points(points: &[Point2], tolerance: f64, closed: bool) -> Vec<Point2> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let tol_sq = tolerance * tolerance;
    let mut kept = vec![first];
    for (i, pt) in rest.iter().enumerate() {
        let is_last = i + 1 == rest.len();
        let prev = kept[kept.len() - 1];
        if nalgebra::distance_squared(&prev, pt) >= tol_sq {
            kept.push(*pt);
        } else if is_last && !closed && kept.len() > 1 {
            // Keep the real path end, drop the near-duplicate before it.
            let last = kept.len() - 1;
            kept[last] = *pt;
        }
    }
    if closed {
        while kept.len() > 1 && nalgebra::distance_squared(&kept[kept.len() - 1], &first) < tol_sq
        {
            kept.pop();
        }
    }
    kept
}

/// Removes ring vertices whose neighbours are collinear with them.
#[must_use]
pub fn remove_collinear(ring: &[Point2]) -> Vec<Point2> {
    let n = ring.len();
    if n < 4 {
        return ring.to_vec();
    }
    let mut kept: Vec<Point2> = Vec::with_capacity(n);
    for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let next = ring[(i + 1) % n];
        let cur = ring[i];
        let u = cur - prev;
        let v = next - cur;
        let cross = u.x * v.y - u.y * v.x;
        let forward = u.dot(&v) > 0.0;
        if cross.abs() > TOLERANCE * u.norm().max(v.norm()) || !forward {
            kept.push(cur);
        }
    }
    if kept.len() < 3 {
        return ring.to_vec();
    }
    kept
}

/// Drops a repeated closing vertex, if present.
#[must_use]
pub fn open_ring(points: &[Point2]) -> &[Point2] {
    match points {
        [first, .., last] if points.len() > 1 && first == last => &points[..points.len() - 1],
        _ => points,
    }
}
