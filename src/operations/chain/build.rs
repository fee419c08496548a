use crate::error::Result;
use crate::geometry::{segments_of, Geometry};
use crate::math::Point2;

use super::{MonotoneChain, SegmentLabel};

/// Decomposes one ring or path into maximal monotone chains.
///
/// Segments with identical endpoints are skipped. Each segment is labelled
/// `(object_index, sequence_index, i)` where `i` is its position in the
/// ring/path. For a closed ring whose last chain runs straight into the
/// first one, the two are joined.
///
/// # Errors
///
/// Propagates orientation errors from chain insertion.
pub fn build_chains(
    points: &[Point2],
    closed: bool,
    object_index: usize,
    sequence_index: usize,
) -> Result<Vec<MonotoneChain>> {
    let mut chains: Vec<MonotoneChain> = Vec::new();
    for (i, segment) in segments_of(points, closed).enumerate() {
        if segment.v1 == segment.v2 {
            continue;
        }
        let label = SegmentLabel::new(object_index, sequence_index, i);
        let inserted = match chains.last_mut() {
            Some(chain) => chain.insert_segment_with_label(segment, label)?,
            None => false,
        };
        if !inserted {
            chains.push(MonotoneChain::from_segment(segment, label)?);
        }
    }

    if closed && chains.len() > 1 {
        let joinable = {
            let first = &chains[0];
            let last = &chains[chains.len() - 1];
            first.orientation() == last.orientation() && last.last_point() == first.first_point()
        };
        if joinable {
            if let Some(tail) = chains.pop() {
                let head = &mut chains[0];
                for (segment, label) in tail.segments().iter().zip(tail.labels()).rev() {
                    head.insert_segment_with_label(*segment, *label)?;
                }
            }
        }
    }
    Ok(chains)
}

/// Builds the chains of every ring (polygon) or path (polyline) of a geometry.
///
/// Kinds without edges yield no chains.
///
/// # Errors
///
/// Propagates orientation errors from chain insertion.
pub fn chains_for_geometry(geometry: &Geometry, object_index: usize) -> Result<Vec<MonotoneChain>> {
    let mut chains = Vec::new();
    match geometry {
        Geometry::Polygon(polygon) => {
            for (seq, ring) in polygon.rings.iter().enumerate() {
                chains.extend(build_chains(ring, true, object_index, seq)?);
            }
        }
        Geometry::Polyline(polyline) => {
            for (seq, path) in polyline.paths.iter().enumerate() {
                chains.extend(build_chains(path, false, object_index, seq)?);
            }
        }
        Geometry::Segment(segment) => {
            chains.extend(build_chains(&[segment.v1, segment.v2], false, object_index, 0)?);
        }
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
    }
    Ok(chains)
}
