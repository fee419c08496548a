use crate::math::Point2;

use super::node::NodeId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the planar graph.
    pub struct EdgeId;
}

/// Classification attached to an edge by graph consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeTag {
    /// Part of a linear spur that closes no ring.
    Dangle,
    /// Separates two faces without bounding a ring of its own.
    Cut,
}

/// Data associated with a graph edge.
///
/// An edge is a maximal run of linework between two nodes. Its
/// coordinates run from the start node's point to the end node's point;
/// a self-loop starts and ends on the same node.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Start node of the edge.
    pub start: NodeId,
    /// End node of the edge.
    pub end: NodeId,
    /// Coordinates of the run, endpoints included.
    pub points: Vec<Point2>,
    /// Whether the edge takes part in face extraction.
    pub enabled: bool,
    /// Optional classification.
    pub tag: Option<EdgeTag>,
}

impl EdgeData {
    /// Creates an enabled, untagged edge.
    #[must_use]
    pub fn new(start: NodeId, end: NodeId, points: Vec<Point2>) -> Self {
        Self {
            start,
            end,
            points,
            enabled: true,
            tag: None,
        }
    }

    /// Returns `true` if the edge starts and ends on the same node.
    #[must_use]
    pub fn is_loop(&self) -> bool {
        self.start == self.end
    }

    /// Returns the endpoint opposite `node`.
    #[must_use]
    pub fn other_end(&self, node: NodeId) -> NodeId {
        if self.start == node {
            self.end
        } else {
            self.start
        }
    }
}
