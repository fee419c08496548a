//! Bridge between the crate's ring-set polygons and the `geo` crate, which
//! supplies Boolean overlay, containment, area and line simplification.

use geo::{Area, BooleanOps, Contains, Coord, Intersects, LineString, MultiPolygon, Simplify};

use crate::math::polygon_2d::{open_ring, signed_area_2d};
use crate::math::{Point2, TOLERANCE};

use super::Polygon;

fn coord(p: &Point2) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

fn line_string(ring: &[Point2]) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = ring.iter().map(coord).collect();
    if let Some(&first) = coords.first() {
        coords.push(first);
    }
    LineString::new(coords)
}

fn ring_points(ls: &LineString<f64>) -> Vec<Point2> {
    let pts: Vec<Point2> = ls.coords().map(|c| Point2::new(c.x, c.y)).collect();
    open_ring(&pts).to_vec()
}

/// Converts a ring set into a `geo` multipolygon.
///
/// Rings are classified by nesting depth rather than orientation: a ring
/// inside an even number of other rings is an exterior, otherwise it is a
/// hole of the smallest enclosing exterior.
#[must_use]
pub fn to_geo(polygon: &Polygon) -> MultiPolygon<f64> {
    let rings: Vec<&Vec<Point2>> = polygon.rings.iter().filter(|r| r.len() >= 3).collect();
    if rings.len() == 1 {
        return MultiPolygon::new(vec![geo::Polygon::new(line_string(rings[0]), vec![])]);
    }

    let shapes: Vec<geo::Polygon<f64>> = rings
        .iter()
        .map(|r| geo::Polygon::new(line_string(r), vec![]))
        .collect();
    let areas: Vec<f64> = rings.iter().map(|r| signed_area_2d(r).abs()).collect();
    let parents = |i: usize| -> Vec<usize> {
        let probe = coord(&rings[i][0]);
        (0..rings.len())
            .filter(|&j| j != i && shapes[j].contains(&probe))
            .collect()
    };

    let mut exteriors: Vec<(usize, Vec<LineString<f64>>)> = Vec::new();
    let mut holes: Vec<(usize, Vec<usize>)> = Vec::new();
    for i in 0..rings.len() {
        let enclosing = parents(i);
        if enclosing.len() % 2 == 0 {
            exteriors.push((i, Vec::new()));
        } else {
            holes.push((i, enclosing));
        }
    }

    for (hole, enclosing) in holes {
        let owner = exteriors
            .iter_mut()
            .filter(|(ext, _)| enclosing.contains(ext))
            .min_by(|a, b| areas[a.0].total_cmp(&areas[b.0]));
        if let Some((_, interiors)) = owner {
            interiors.push(line_string(rings[hole]));
        }
    }

    MultiPolygon::new(
        exteriors
            .into_iter()
            .map(|(ext, interiors)| geo::Polygon::new(line_string(rings[ext]), interiors))
            .collect(),
    )
}

/// Converts a `geo` multipolygon back into a ring set.
///
/// Exteriors come out counter-clockwise, holes clockwise.
#[must_use]
pub fn from_geo(mp: &MultiPolygon<f64>) -> Polygon {
    let mut rings = Vec::new();
    for poly in &mp.0 {
        let mut exterior = ring_points(poly.exterior());
        if exterior.len() < 3 {
            continue;
        }
        if signed_area_2d(&exterior) < 0.0 {
            exterior.reverse();
        }
        rings.push(exterior);
        for interior in poly.interiors() {
            let mut hole = ring_points(interior);
            if hole.len() < 3 {
                continue;
            }
            if signed_area_2d(&hole) > 0.0 {
                hole.reverse();
            }
            rings.push(hole);
        }
    }
    Polygon { rings }
}

/// Boolean union of two multipolygons.
#[must_use]
pub fn union_multi(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    if a.0.is_empty() {
        return b.clone();
    }
    if b.0.is_empty() {
        return a.clone();
    }
    a.union(b)
}

/// Boolean difference `a - b` of two multipolygons.
#[must_use]
pub fn difference_multi(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    if a.0.is_empty() || b.0.is_empty() {
        return a.clone();
    }
    a.difference(b)
}

/// Returns `true` if `p` lies inside or on the boundary of `mp`.
#[must_use]
pub fn intersects_point(mp: &MultiPolygon<f64>, p: &Point2) -> bool {
    let c = coord(p);
    mp.0.iter().any(|poly| poly.intersects(&c))
}

/// Returns `true` if `p` lies strictly inside `mp`, off its boundary.
#[must_use]
pub fn contains_point_strictly(mp: &MultiPolygon<f64>, p: &Point2) -> bool {
    let c = coord(p);
    mp.0.iter().any(|poly| poly.contains(&c))
}

/// Returns the unsigned area covered by `mp`.
#[must_use]
pub fn area(mp: &MultiPolygon<f64>) -> f64 {
    mp.unsigned_area()
}

/// Ramer-Douglas-Peucker simplification of a single ring at [`TOLERANCE`].
#[must_use]
pub fn simplify_ring(ring: &[Point2]) -> Vec<Point2> {
    if ring.len() < 4 {
        return ring.to_vec();
    }
    let simplified = ring_points(&line_string(ring).simplify(&TOLERANCE));
    if simplified.len() < 3 {
        return ring.to_vec();
    }
    simplified
}
