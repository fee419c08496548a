mod build;
pub mod edge;
mod faces;
pub mod node;

pub use edge::{EdgeData, EdgeId, EdgeTag};
pub use faces::Faces;
pub use node::{NodeData, NodeId};

use crate::error::TopologyError;
use crate::math::TOLERANCE;
use slotmap::SlotMap;

/// Options for [`PlanarGraph::build`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphOptions {
    /// Endpoints closer than this are merged into one node.
    pub node_tolerance: f64,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            node_tolerance: TOLERANCE,
        }
    }
}

/// Planar embedding of a set of linework.
///
/// Nodes and edges live in arenas addressed by typed IDs (generational
/// indices). Nothing is ever removed; consumers disable elements instead,
/// which keeps every ID valid while traversals run.
#[derive(Debug, Default)]
pub struct PlanarGraph {
    nodes: SlotMap<NodeId, NodeData>,
    edges: SlotMap<EdgeId, EdgeData>,
}

impl PlanarGraph {
    /// Creates a new, empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Node operations ---

    /// Inserts a node and returns its ID.
    pub fn add_node(&mut self, data: NodeData) -> NodeId {
        self.nodes.insert(data)
    }

    /// Returns a reference to the node data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn node(&self, id: NodeId) -> Result<&NodeData, TopologyError> {
        self.nodes
            .get(id)
            .ok_or(TopologyError::EntityNotFound("node"))
    }

    /// Returns a mutable reference to the node data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData, TopologyError> {
        self.nodes
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("node"))
    }

    /// Iterates all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        self.nodes.iter()
    }

    /// Returns the number of nodes, enabled or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // --- Edge operations ---

    /// Inserts an edge, registers it with both endpoints, and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint is not in the graph.
    pub fn add_edge(&mut self, data: EdgeData) -> Result<EdgeId, TopologyError> {
        let (start, end) = (data.start, data.end);
        self.node(start)?;
        self.node(end)?;
        let id = self.edges.insert(data);
        self.node_mut(start)?.edges.push(id);
        self.node_mut(end)?.edges.push(id);
        Ok(id)
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or(TopologyError::EntityNotFound("edge"))
    }

    /// Returns a mutable reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn edge_mut(&mut self, id: EdgeId) -> Result<&mut EdgeData, TopologyError> {
        self.edges
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("edge"))
    }

    /// Iterates all edges.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    /// Returns the number of edges, enabled or not.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // --- Enabled state ---

    /// Enables or disables every node and edge.
    pub fn set_elements_enabled_state(&mut self, enabled: bool) {
        for node in self.nodes.values_mut() {
            node.enabled = enabled;
        }
        for edge in self.edges.values_mut() {
            edge.enabled = enabled;
        }
    }

    /// Returns the enabled edges incident to `node`, a self-loop listed twice.
    ///
    /// # Errors
    ///
    /// Returns an error if the node or one of its edges is not in the graph.
    pub fn enabled_edges(&self, node: NodeId) -> Result<Vec<EdgeId>, TopologyError> {
        let mut out = Vec::new();
        for &e in &self.node(node)?.edges {
            if self.edge(e)?.enabled {
                out.push(e);
            }
        }
        Ok(out)
    }

    /// Number of enabled edge ends at `node`.
    ///
    /// # Errors
    ///
    /// Returns an error if the node or one of its edges is not in the graph.
    pub fn enabled_degree(&self, node: NodeId) -> Result<usize, TopologyError> {
        Ok(self.enabled_edges(node)?.len())
    }
}
