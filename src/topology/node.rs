use crate::math::Point2;

use super::edge::EdgeId;

slotmap::new_key_type! {
    /// Unique identifier for a node in the planar graph.
    pub struct NodeId;
}

/// Data associated with a graph node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// The position of the node.
    pub point: Point2,
    /// Incident edges. A self-loop appears twice.
    pub edges: Vec<EdgeId>,
    /// Whether the node takes part in face extraction.
    pub enabled: bool,
}

impl NodeData {
    /// Creates an enabled node with no incident edges.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self {
            point,
            edges: Vec::new(),
            enabled: true,
        }
    }
}
