//! Monotone chain index.
//!
//! A ring or path is decomposed into runs of connected segments that all
//! point into the same quadrant. Along such a run both coordinates change
//! monotonically, so the bounding rectangle of any sub-run follows from its
//! two end vertices. Chain pairs whose rectangles miss each other are
//! rejected before any segment-pair work.

mod build;
mod orientation;

pub use build::{build_chains, chains_for_geometry};
pub use orientation::{segment_orientation, ChainOrientation};

use crate::error::Result;
use crate::geometry::{BoundingRect, Segment};
use crate::math::distance_2d::point_to_line_dist;
use crate::math::intersect_2d::SegmentIntersection;
use crate::math::{horizontal_cmp, points_equal, Point2, TOLERANCE};

/// Provenance of a segment: which object, which ring/path inside it, and
/// which segment of that ring/path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SegmentLabel {
    object_index: usize,
    sequence_index: usize,
    index_in_sequence: usize,
}

impl SegmentLabel {
    /// Creates a label.
    #[must_use]
    pub fn new(object_index: usize, sequence_index: usize, index_in_sequence: usize) -> Self {
        Self {
            object_index,
            sequence_index,
            index_in_sequence,
        }
    }

    #[must_use]
    pub fn object_index(&self) -> usize {
        self.object_index
    }

    #[must_use]
    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    #[must_use]
    pub fn index_in_sequence(&self) -> usize {
        self.index_in_sequence
    }
}

/// A pair of intersecting segments found between two chains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainCrossing {
    /// Segment index in the queried chain.
    pub index: usize,
    /// Segment index in the other chain.
    pub other_index: usize,
    pub intersection: SegmentIntersection,
}

/// A connected run of segments sharing one [`ChainOrientation`].
///
/// Invariants: consecutive segments share an endpoint exactly, every segment
/// has the chain's orientation, and `labels` runs parallel to `segments`.
#[derive(Debug, Clone)]
pub struct MonotoneChain {
    orientation: ChainOrientation,
    segments: Vec<Segment>,
    labels: Vec<SegmentLabel>,
    bounds: Option<BoundingRect>,
}

impl MonotoneChain {
    /// Creates an empty chain that accepts segments of `orientation`.
    #[must_use]
    pub fn new(orientation: ChainOrientation) -> Self {
        Self {
            orientation,
            segments: Vec::new(),
            labels: Vec::new(),
            bounds: None,
        }
    }

    /// Creates a chain holding a single segment.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a zero-length segment.
    pub fn from_segment(segment: Segment, label: SegmentLabel) -> Result<Self> {
        let mut chain = Self::new(segment_orientation(&segment)?);
        chain.segments.push(segment);
        chain.labels.push(label);
        chain.update_bounds();
        Ok(chain)
    }

    #[must_use]
    pub fn orientation(&self) -> ChainOrientation {
        self.orientation
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn labels(&self) -> &[SegmentLabel] {
        &self.labels
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the cached bounding rectangle, `None` while the chain is empty.
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingRect> {
        self.bounds
    }

    /// Returns the start vertex of the chain.
    #[must_use]
    pub fn first_point(&self) -> Option<Point2> {
        self.segments.first().map(|s| s.v1)
    }

    /// Returns the end vertex of the chain.
    #[must_use]
    pub fn last_point(&self) -> Option<Point2> {
        self.segments.last().map(|s| s.v2)
    }

    /// Inserts a segment with a default label. See [`Self::insert_segment_with_label`].
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a zero-length segment.
    pub fn insert_segment(&mut self, segment: Segment) -> Result<bool> {
        self.insert_segment_with_label(segment, SegmentLabel::default())
    }

    /// Appends or prepends `segment` if it keeps the chain monotone and
    /// connected.
    ///
    /// Returns `Ok(false)` without modifying the chain when the segment's
    /// orientation differs from the chain's, or when the chain is non-empty
    /// and the segment touches neither open end (exact coordinate equality).
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a zero-length segment.
    pub fn insert_segment_with_label(
        &mut self,
        segment: Segment,
        label: SegmentLabel,
    ) -> Result<bool> {
        if segment_orientation(&segment)? != self.orientation {
            return Ok(false);
        }
        let (Some(first), Some(last)) = (self.first_point(), self.last_point()) else {
            self.segments.push(segment);
            self.labels.push(label);
            self.update_bounds();
            return Ok(true);
        };

        if segment.v1 == last {
            self.segments.push(segment);
            self.labels.push(label);
        } else if segment.v2 == first {
            self.segments.insert(0, segment);
            self.labels.insert(0, label);
        } else {
            return Ok(false);
        }
        self.update_bounds();
        Ok(true)
    }

    /// O(1) rectangle overlap test against another chain.
    #[must_use]
    pub fn bounds_intersect(&self, other: &MonotoneChain) -> bool {
        match (self.bounds, other.bounds) {
            (Some(a), Some(b)) => a.intersects(&b),
            _ => false,
        }
    }

    /// O(1) test of `p` against the chain's rectangle.
    #[must_use]
    pub fn bounds_contain_point(&self, p: &Point2) -> bool {
        self.bounds.is_some_and(|r| r.contains_point(p))
    }

    /// Returns every segment pair that meets between this chain and `other`.
    #[must_use]
    pub fn get_cross_segments(&self, other: &MonotoneChain) -> Vec<ChainCrossing> {
        let mut crossings = Vec::new();
        self.visit_crossings(other, |crossing| {
            crossings.push(crossing);
            true
        });
        crossings
    }

    /// Returns the intersection points with `other`; a collinear overlap
    /// contributes both of its ends.
    #[must_use]
    pub fn get_cross_points(&self, other: &MonotoneChain) -> Vec<Point2> {
        let mut points = Vec::new();
        self.visit_crossings(other, |crossing| {
            match crossing.intersection {
                SegmentIntersection::Point(p) => points.push(p),
                SegmentIntersection::Overlap(a, b) => {
                    points.push(a);
                    points.push(b);
                }
                SegmentIntersection::None => {}
            }
            true
        });
        points
    }

    /// Returns `true` if any segment of this chain meets any segment of `other`.
    #[must_use]
    pub fn crosses_with(&self, other: &MonotoneChain) -> bool {
        let mut found = false;
        self.visit_crossings(other, |_| {
            found = true;
            false
        });
        found
    }

    /// Runs the pairwise segment test after the chain-level bounds check,
    /// stopping when `visit` returns `false`.
    fn visit_crossings(&self, other: &MonotoneChain, mut visit: impl FnMut(ChainCrossing) -> bool) {
        if !self.bounds_intersect(other) {
            return;
        }
        let other_bounds: Vec<BoundingRect> = other.segments.iter().map(Segment::bounds).collect();
        for (i, seg) in self.segments.iter().enumerate() {
            let seg_bounds = seg.bounds().expanded(TOLERANCE);
            if other.bounds.is_some_and(|r| !r.intersects(&seg_bounds)) {
                continue;
            }
            for (j, other_seg) in other.segments.iter().enumerate() {
                if !seg_bounds.intersects(&other_bounds[j]) {
                    continue;
                }
                let intersection = seg.intersection(other_seg);
                if intersection.is_some() {
                    let keep_going = visit(ChainCrossing {
                        index: i,
                        other_index: j,
                        intersection,
                    });
                    if !keep_going {
                        return;
                    }
                }
            }
        }
    }

    /// Removes segments shorter than `min_length`.
    ///
    /// A short segment is absorbed by moving its predecessor's far endpoint
    /// onto the short segment's end, which keeps the chain connected; a short
    /// segment with no predecessor is dropped.
    pub fn reduce_segments(&mut self, min_length: f64) {
        let mut segments: Vec<Segment> = Vec::with_capacity(self.segments.len());
        let mut labels = Vec::with_capacity(self.labels.len());
        for (seg, label) in self.segments.iter().zip(&self.labels) {
            if seg.length() < min_length {
                if let Some(prev) = segments.last_mut() {
                    prev.v2 = seg.v2;
                }
                continue;
            }
            segments.push(*seg);
            labels.push(*label);
        }
        self.segments = segments;
        self.labels = labels;
        self.update_bounds();
    }

    /// Splits segments at the given points.
    ///
    /// Only points strictly inside a segment are used: within [`TOLERANCE`]
    /// of its line and farther than [`TOLERANCE`] from both endpoints. Each
    /// affected segment is replaced by its run of sub-segments, ordered along
    /// the segment's direction and carrying the original segment's label.
    ///
    /// Returns `true` if any segment was split.
    pub fn split(&mut self, points: &[Point2]) -> bool {
        let Some(rect) = self.bounds else {
            return false;
        };
        let mut candidates: Vec<Point2> = points
            .iter()
            .filter(|p| rect.expanded(TOLERANCE).contains_point(p))
            .filter(|p| self.point_in_range(p, 0, self.segments.len() - 1, TOLERANCE))
            .copied()
            .collect();
        if candidates.is_empty() {
            return false;
        }
        candidates.sort_by(horizontal_cmp);
        candidates.dedup_by(|a, b| points_equal(a, b));

        let mut pieces_per_segment: Vec<Option<Vec<Segment>>> = Vec::with_capacity(self.len());
        let mut any_split = false;
        for seg in &self.segments {
            let pieces = split_segment(seg, &candidates);
            any_split |= pieces.is_some();
            pieces_per_segment.push(pieces);
        }
        if !any_split {
            return false;
        }

        let mut segments = Vec::with_capacity(self.segments.len() + candidates.len());
        let mut labels = Vec::with_capacity(segments.capacity());
        for ((seg, label), pieces) in self.segments.iter().zip(&self.labels).zip(pieces_per_segment) {
            match pieces {
                Some(pieces) => {
                    labels.extend(std::iter::repeat(*label).take(pieces.len()));
                    segments.extend(pieces);
                }
                None => {
                    segments.push(*seg);
                    labels.push(*label);
                }
            }
        }
        self.segments = segments;
        self.labels = labels;
        self.update_bounds();
        true
    }

    /// Returns `true` if `p` lies in the bounding rectangle of some segment.
    ///
    /// Bisects the segment range; each sub-range rectangle comes straight from
    /// its two boundary vertices, so the test runs in O(log n).
    #[must_use]
    pub fn is_point_in_segments_bounds(&self, p: &Point2) -> bool {
        !self.is_empty() && self.point_in_range(p, 0, self.segments.len() - 1, 0.0)
    }

    fn point_in_range(&self, p: &Point2, lo: usize, hi: usize, margin: f64) -> bool {
        if !self.range_bounds(lo, hi).expanded(margin).contains_point(p) {
            return false;
        }
        if lo == hi {
            return true;
        }
        let mid = lo + (hi - lo) / 2;
        self.point_in_range(p, lo, mid, margin) || self.point_in_range(p, mid + 1, hi, margin)
    }

    /// Rectangle covering segments `lo..=hi`, derived from the run's two end
    /// vertices.
    fn range_bounds(&self, lo: usize, hi: usize) -> BoundingRect {
        let start = self.segments[lo].v1;
        let end = self.segments[hi].v2;
        let (min, max) = match self.orientation {
            ChainOrientation::RightUp => (start, end),
            ChainOrientation::RightDown => {
                (Point2::new(start.x, end.y), Point2::new(end.x, start.y))
            }
            ChainOrientation::LeftUp => (Point2::new(end.x, start.y), Point2::new(start.x, end.y)),
            ChainOrientation::LeftDown => (end, start),
        };
        BoundingRect { min, max }
    }

    fn update_bounds(&mut self) {
        self.bounds = if self.segments.is_empty() {
            None
        } else {
            Some(self.range_bounds(0, self.segments.len() - 1))
        };
    }
}

/// Splits one segment at the candidate points strictly inside it.
///
/// Returns `None` when no candidate qualifies.
fn split_segment(seg: &Segment, candidates: &[Point2]) -> Option<Vec<Segment>> {
    let rect = seg.bounds().expanded(TOLERANCE);
    let dir = seg.v2 - seg.v1;
    let len_sq = dir.norm_squared();

    let mut inner: Vec<(f64, Point2)> = candidates
        .iter()
        .filter(|p| rect.contains_point(p))
        .filter(|p| point_to_line_dist(p, &seg.v1, &seg.v2) <= TOLERANCE)
        .filter(|p| !points_equal(p, &seg.v1) && !points_equal(p, &seg.v2))
        .map(|p| {
            let t = (p - seg.v1).dot(&dir) / len_sq;
            (t, project_onto(seg, t))
        })
        .filter(|(t, _)| *t > 0.0 && *t < 1.0)
        .collect();
    if inner.is_empty() {
        return None;
    }
    inner.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut pieces = Vec::with_capacity(inner.len() + 1);
    let mut start = seg.v1;
    for (_, p) in inner {
        if points_equal(&start, &p) {
            continue;
        }
        pieces.push(Segment::new(start, p));
        start = p;
    }
    if points_equal(&start, &seg.v2) {
        // The last split point collapsed onto the end; stretch the final piece.
        match pieces.last_mut() {
            Some(last) => last.v2 = seg.v2,
            None => return None,
        }
    } else {
        pieces.push(Segment::new(start, seg.v2));
    }
    (pieces.len() > 1).then_some(pieces)
}

/// Projects parameter `t` onto the segment, clamped to its rectangle so the
/// sub-segments keep the parent's orientation.
fn project_onto(seg: &Segment, t: f64) -> Point2 {
    let p = seg.v1 + (seg.v2 - seg.v1) * t;
    let r = seg.bounds();
    Point2::new(p.x.clamp(r.min.x, r.max.x), p.y.clamp(r.min.y, r.max.y))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(p(x1, y1), p(x2, y2))
    }

    /// A `RightUp` staircase (0,0) → (1,0) → (1,1) → (2,1) → (2,2).
    fn staircase() -> MonotoneChain {
        let mut chain = MonotoneChain::new(ChainOrientation::RightUp);
        for s in [
            seg(0.0, 0.0, 1.0, 0.0),
            seg(1.0, 0.0, 1.0, 1.0),
            seg(1.0, 1.0, 2.0, 1.0),
            seg(2.0, 1.0, 2.0, 2.0),
        ] {
            assert!(chain.insert_segment(s).unwrap());
        }
        chain
    }

    #[test]
    fn insert_rejects_other_orientation() {
        let mut chain = MonotoneChain::from_segment(seg(0.0, 0.0, 1.0, 1.0), SegmentLabel::default())
            .unwrap();
        assert!(!chain.insert_segment(seg(1.0, 1.0, 2.0, 0.0)).unwrap());
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn insert_rejects_disconnected_segment() {
        let mut chain = MonotoneChain::from_segment(seg(0.0, 0.0, 1.0, 1.0), SegmentLabel::default())
            .unwrap();
        assert!(!chain.insert_segment(seg(5.0, 5.0, 6.0, 6.0)).unwrap());
        // Touching the end with the wrong vertex is not a connection either.
        assert!(!chain.insert_segment(seg(0.5, 0.5, 1.0, 1.0)).unwrap());
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn insert_at_front_and_back() {
        let mut chain = MonotoneChain::from_segment(seg(1.0, 1.0, 2.0, 2.0), SegmentLabel::new(0, 0, 1))
            .unwrap();
        assert!(chain
            .insert_segment_with_label(seg(2.0, 2.0, 3.0, 3.0), SegmentLabel::new(0, 0, 2))
            .unwrap());
        assert!(chain
            .insert_segment_with_label(seg(0.0, 0.0, 1.0, 1.0), SegmentLabel::new(0, 0, 0))
            .unwrap());
        assert_eq!(chain.first_point(), Some(p(0.0, 0.0)));
        assert_eq!(chain.last_point(), Some(p(3.0, 3.0)));
        let order: Vec<usize> = chain.labels().iter().map(SegmentLabel::index_in_sequence).collect();
        assert_eq!(order, vec![0, 1, 2]);
        let r = chain.bounds().unwrap();
        assert_eq!((r.min, r.max), (p(0.0, 0.0), p(3.0, 3.0)));
    }

    #[test]
    fn insert_into_empty_chain() {
        let mut chain = MonotoneChain::new(ChainOrientation::LeftDown);
        assert!(chain.insert_segment(seg(3.0, 3.0, 1.0, 2.0)).unwrap());
        assert!(!chain.insert_segment(seg(1.0, 2.0, 2.0, 1.0)).unwrap());
    }

    #[test]
    fn insert_degenerate_is_an_error() {
        let mut chain = MonotoneChain::new(ChainOrientation::RightUp);
        assert!(chain.insert_segment(seg(1.0, 1.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn bounds_of_descending_chain() {
        let mut chain = MonotoneChain::new(ChainOrientation::LeftDown);
        chain.insert_segment(seg(4.0, 4.0, 3.0, 1.0)).unwrap();
        chain.insert_segment(seg(3.0, 1.0, 0.0, 0.0)).unwrap();
        let r = chain.bounds().unwrap();
        assert_eq!((r.min, r.max), (p(0.0, 0.0), p(4.0, 4.0)));
        assert!(chain.bounds_contain_point(&p(1.0, 3.0)));
        assert!(!chain.is_point_in_segments_bounds(&p(1.0, 3.0)));
        assert!(chain.is_point_in_segments_bounds(&p(3.5, 2.0)));
    }

    #[test]
    fn point_in_segment_bounds_by_bisection() {
        let chain = staircase();
        assert!(chain.is_point_in_segments_bounds(&p(0.5, 0.0)));
        assert!(chain.is_point_in_segments_bounds(&p(2.0, 1.5)));
        assert!(chain.is_point_in_segments_bounds(&p(1.0, 1.0)));
        // Inside the chain rectangle, outside every segment rectangle.
        assert!(!chain.is_point_in_segments_bounds(&p(0.5, 1.5)));
        assert!(!chain.is_point_in_segments_bounds(&p(1.5, 0.5)));
    }

    #[test]
    fn cross_points_and_segments() {
        let a = staircase();
        let mut b = MonotoneChain::new(ChainOrientation::RightDown);
        b.insert_segment(seg(0.0, 2.0, 2.0, 0.0)).unwrap();
        assert!(a.crosses_with(&b));
        // The crossing lands on a shared vertex of two staircase segments.
        let pts = a.get_cross_points(&b);
        assert_eq!(pts, vec![p(1.0, 1.0), p(1.0, 1.0)]);
        let crossings = a.get_cross_segments(&b);
        assert_eq!(crossings.len(), 2);
        assert!(crossings.iter().all(|c| c.other_index == 0));
    }

    #[test]
    fn disjoint_bounds_skip_pair_tests() {
        let a = staircase();
        let b = MonotoneChain::from_segment(seg(10.0, 10.0, 11.0, 11.0), SegmentLabel::default())
            .unwrap();
        assert!(!a.bounds_intersect(&b));
        assert!(!a.crosses_with(&b));
        assert!(a.get_cross_points(&b).is_empty());
    }

    #[test]
    fn overlap_reports_both_ends() {
        let a = MonotoneChain::from_segment(seg(0.0, 0.0, 4.0, 0.0), SegmentLabel::default()).unwrap();
        let b = MonotoneChain::from_segment(seg(2.0, 0.0, 6.0, 0.0), SegmentLabel::default()).unwrap();
        let pts = a.get_cross_points(&b);
        assert_eq!(pts, vec![p(2.0, 0.0), p(4.0, 0.0)]);
    }

    #[test]
    fn reduce_absorbs_short_segment_into_predecessor() {
        let mut chain = MonotoneChain::new(ChainOrientation::RightUp);
        chain.insert_segment(seg(0.0, 0.0, 1.0, 0.0)).unwrap();
        chain.insert_segment(seg(1.0, 0.0, 1.0, 0.001)).unwrap();
        chain.insert_segment(seg(1.0, 0.001, 2.0, 1.0)).unwrap();
        chain.reduce_segments(0.01);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.segments()[0], seg(0.0, 0.0, 1.0, 0.001));
        assert_eq!(chain.segments()[1].v1, chain.segments()[0].v2);
    }

    #[test]
    fn reduce_drops_short_first_segment() {
        let mut chain = MonotoneChain::new(ChainOrientation::RightUp);
        chain.insert_segment(seg(0.0, 0.0, 0.001, 0.0)).unwrap();
        chain.insert_segment(seg(0.001, 0.0, 1.0, 1.0)).unwrap();
        chain.reduce_segments(0.01);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.first_point(), Some(p(0.001, 0.0)));
        let r = chain.bounds().unwrap();
        assert_eq!(r.min, p(0.001, 0.0));
    }

    #[test]
    fn split_orders_points_along_segment() {
        let mut chain = MonotoneChain::new(ChainOrientation::LeftDown);
        chain
            .insert_segment_with_label(seg(4.0, 0.0, 0.0, 0.0), SegmentLabel::new(1, 2, 3))
            .unwrap();
        // Unordered input, one endpoint and one off-line point to ignore.
        let split = chain.split(&[p(1.0, 0.0), p(3.0, 0.0), p(0.0, 0.0), p(2.0, 0.5)]);
        assert!(split);
        let verts: Vec<Point2> = chain.segments().iter().map(|s| s.v1).collect();
        assert_eq!(verts, vec![p(4.0, 0.0), p(3.0, 0.0), p(1.0, 0.0)]);
        assert_eq!(chain.last_point(), Some(p(0.0, 0.0)));
        assert!(chain.labels().iter().all(|l| *l == SegmentLabel::new(1, 2, 3)));
        assert!(chain
            .segments()
            .iter()
            .all(|s| segment_orientation(s).unwrap() == ChainOrientation::LeftDown));
    }

    #[test]
    fn split_ignores_endpoints_and_far_points() {
        let mut chain = staircase();
        assert!(!chain.split(&[p(1.0, 0.0), p(5.0, 5.0), p(0.5, 0.5)]));
        assert_eq!(chain.len(), 4);
    }

    #[test]
    fn split_within_tolerance_of_line() {
        let mut chain = staircase();
        assert!(chain.split(&[p(0.5, TOLERANCE * 0.5)]));
        assert_eq!(chain.len(), 5);
        assert_eq!(chain.segments()[0].v2, p(0.5, 0.0));
    }
}
