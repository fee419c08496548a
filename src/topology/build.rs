use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, trace};

use crate::error::{OperationError, Result};
use crate::geometry::{Polyline, Segment};
use crate::math::distance_2d::point_to_point_dist;
use crate::math::Point2;
use crate::operations::chain::build_chains;

use super::{EdgeData, GraphOptions, NodeData, NodeId, PlanarGraph};

/// Smallest grid cell used for node snapping.
const MIN_CELL: f64 = 1e-6;

impl PlanarGraph {
    /// Builds the planar graph of a set of linework.
    ///
    /// Paths are noded against each other: every crossing and every
    /// endpoint touching another segment's interior becomes a vertex.
    /// Vertices within `options.node_tolerance` are merged, coincident
    /// segments collapse to one, and chains of degree-2 vertices are folded
    /// into single edges. A ring with no junction becomes a self-loop on one
    /// node.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidArgument` if the node tolerance is not
    /// a positive finite number.
    pub fn build(polyline: &Polyline, options: GraphOptions) -> Result<Self> {
        let tolerance = options.node_tolerance;
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(OperationError::InvalidArgument(format!(
                "node tolerance must be positive, got {tolerance}"
            ))
            .into());
        }

        let segments = noded_segments(polyline)?;
        let mut snapper = NodeSnapper::new(tolerance);
        let mut pairs = BTreeSet::new();
        for segment in &segments {
            let a = snapper.vertex(segment.v1);
            let b = snapper.vertex(segment.v2);
            if a != b {
                pairs.insert((a.min(b), a.max(b)));
            }
        }
        let vertices = snapper.points;

        let mut adjacency = vec![Vec::new(); vertices.len()];
        for &(a, b) in &pairs {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }

        let graph = fold_runs(&vertices, &adjacency)?;
        debug!(
            segments = segments.len(),
            vertices = vertices.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built planar graph"
        );
        Ok(graph)
    }
}

/// Splits every path at its crossings with every other path (and itself).
fn noded_segments(polyline: &Polyline) -> Result<Vec<Segment>> {
    let mut chains = Vec::new();
    for (seq, path) in polyline.paths.iter().enumerate() {
        chains.extend(build_chains(path, false, 0, seq)?);
    }

    let mut splits: Vec<Vec<Point2>> = vec![Vec::new(); chains.len()];
    for i in 0..chains.len() {
        let (head, tail) = chains.split_at(i + 1);
        let a = &head[i];
        for (k, b) in tail.iter().enumerate() {
            if !a.bounds_intersect(b) {
                continue;
            }
            let points = a.get_cross_points(b);
            if points.is_empty() {
                continue;
            }
            splits[i].extend_from_slice(&points);
            splits[i + 1 + k].extend(points);
        }
    }

    let mut split_count = 0;
    for (chain, points) in chains.iter_mut().zip(&splits) {
        if !points.is_empty() && chain.split(points) {
            split_count += 1;
        }
    }
    trace!(chains = chains.len(), split = split_count, "noded linework");

    Ok(chains
        .iter()
        .flat_map(|c| c.segments().iter().copied())
        .collect())
}

/// Merges nearby coordinates into shared vertices using a uniform grid.
struct NodeSnapper {
    tolerance: f64,
    cell: f64,
    grid: HashMap<(i64, i64), Vec<usize>>,
    points: Vec<Point2>,
}

impl NodeSnapper {
    fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            cell: tolerance.max(MIN_CELL),
            grid: HashMap::new(),
            points: Vec::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_of(&self, p: &Point2) -> (i64, i64) {
        ((p.x / self.cell).floor() as i64, (p.y / self.cell).floor() as i64)
    }

    /// Returns the index of the vertex at `p`, creating one if none is
    /// within tolerance.
    fn vertex(&mut self, p: Point2) -> usize {
        let (cx, cy) = self.cell_of(&p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let key = (cx.saturating_add(dx), cy.saturating_add(dy));
                if let Some(ids) = self.grid.get(&key) {
                    if let Some(&i) = ids
                        .iter()
                        .find(|&&i| point_to_point_dist(&self.points[i], &p) <= self.tolerance)
                    {
                        return i;
                    }
                }
            }
        }
        let i = self.points.len();
        self.points.push(p);
        self.grid.entry((cx, cy)).or_default().push(i);
        i
    }
}

fn pair_key(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Follows degree-2 vertices from `start` through `first` until a vertex of
/// another degree, or `start` again, is reached.
fn walk_run(
    start: usize,
    first: usize,
    adjacency: &[Vec<usize>],
    visited: &mut HashSet<(usize, usize)>,
) -> Vec<usize> {
    let mut run = vec![start, first];
    visited.insert(pair_key(start, first));
    let (mut prev, mut cur) = (start, first);
    while cur != start && adjacency[cur].len() == 2 {
        let next = if adjacency[cur][0] == prev {
            adjacency[cur][1]
        } else {
            adjacency[cur][0]
        };
        visited.insert(pair_key(cur, next));
        run.push(next);
        prev = cur;
        cur = next;
    }
    run
}

fn fold_runs(vertices: &[Point2], adjacency: &[Vec<usize>]) -> Result<PlanarGraph> {
    let mut graph = PlanarGraph::new();
    let mut node_of: Vec<Option<NodeId>> = vec![None; vertices.len()];
    let mut node_for = |graph: &mut PlanarGraph, v: usize| -> NodeId {
        *node_of[v].get_or_insert_with(|| graph.add_node(NodeData::new(vertices[v])))
    };
    let mut visited = HashSet::new();

    for v in 0..vertices.len() {
        let degree = adjacency[v].len();
        if degree == 0 || degree == 2 {
            continue;
        }
        for &first in &adjacency[v] {
            if visited.contains(&pair_key(v, first)) {
                continue;
            }
            let run = walk_run(v, first, adjacency, &mut visited);
            let end = run[run.len() - 1];
            let a = node_for(&mut graph, v);
            let b = node_for(&mut graph, end);
            let points = run.iter().map(|&i| vertices[i]).collect();
            graph.add_edge(EdgeData::new(a, b, points))?;
        }
    }

    // What is left are rings made only of degree-2 vertices.
    for v in 0..vertices.len() {
        if adjacency[v].len() != 2 || visited.contains(&pair_key(v, adjacency[v][0])) {
            continue;
        }
        let run = walk_run(v, adjacency[v][0], adjacency, &mut visited);
        let a = node_for(&mut graph, v);
        let points = run.iter().map(|&i| vertices[i]).collect();
        graph.add_edge(EdgeData::new(a, a, points))?;
    }
    Ok(graph)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn build(paths: Vec<Vec<Point2>>) -> PlanarGraph {
        PlanarGraph::build(&Polyline::new(paths), GraphOptions::default()).unwrap()
    }

    #[test]
    fn open_path_folds_into_one_edge() {
        let graph = build(vec![vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 1.0), p(3.0, 0.0)]]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        let (_, edge) = graph.edges().next().unwrap();
        assert_eq!(edge.points.len(), 4);
    }

    #[test]
    fn closed_ring_is_a_self_loop() {
        let graph = build(vec![vec![
            p(0.0, 0.0),
            p(1.0, 0.0),
            p(1.0, 1.0),
            p(0.0, 1.0),
            p(0.0, 0.0),
        ]]);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 1);
        let (node, _) = graph.nodes().next().unwrap();
        assert_eq!(graph.enabled_degree(node).unwrap(), 2);
        let (_, edge) = graph.edges().next().unwrap();
        assert!(edge.is_loop());
        assert_eq!(edge.points.len(), 5);
    }

    #[test]
    fn crossing_paths_are_noded() {
        let graph = build(vec![
            vec![p(0.0, 0.0), p(2.0, 2.0)],
            vec![p(0.0, 2.0), p(2.0, 0.0)],
        ]);
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 4);
        let centre = graph
            .nodes()
            .find(|(_, n)| point_to_point_dist(&n.point, &p(1.0, 1.0)) < 1e-9)
            .map(|(id, _)| id)
            .unwrap();
        assert_eq!(graph.enabled_degree(centre).unwrap(), 4);
    }

    #[test]
    fn t_junction_splits_the_crossed_path() {
        let graph = build(vec![
            vec![p(0.0, 0.0), p(4.0, 0.0)],
            vec![p(2.0, 0.0), p(2.0, 3.0)],
        ]);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn duplicate_segments_collapse() {
        let graph = build(vec![
            vec![p(0.0, 0.0), p(3.0, 0.0)],
            vec![p(3.0, 0.0), p(0.0, 0.0)],
        ]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn near_coincident_endpoints_snap() {
        let graph = build(vec![
            vec![p(0.0, 0.0), p(1.0, 0.0)],
            vec![p(1.0 + 1e-12, 0.0), p(1.0, 1.0)],
        ]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn non_positive_tolerance_fails() {
        let options = GraphOptions {
            node_tolerance: 0.0,
        };
        assert!(PlanarGraph::build(&Polyline::new(vec![]), options).is_err());
    }
}
