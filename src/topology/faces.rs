use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::geometry::{boolean, Polygon};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::{Point2, TOLERANCE};

use super::{EdgeId, EdgeTag, NodeId, PlanarGraph};

/// Faces extracted from the enabled part of a [`PlanarGraph`].
#[derive(Debug, Clone, Default)]
pub struct Faces {
    /// One polygon per bounded face, with its holes.
    pub polygons: Vec<Polygon>,
    /// Coordinate runs of the edges tagged [`EdgeTag::Cut`].
    pub cuts: Vec<Vec<Point2>>,
}

/// One traversal direction of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct HalfEdge {
    edge: EdgeId,
    forward: bool,
}

impl HalfEdge {
    fn twin(self) -> Self {
        Self {
            edge: self.edge,
            forward: !self.forward,
        }
    }
}

struct Ring {
    points: Vec<Point2>,
    area: f64,
    half_edges: usize,
}

fn direction(from: &Point2, to: &Point2) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

impl PlanarGraph {
    fn half_edge_points(&self, h: HalfEdge) -> Result<Vec<Point2>> {
        let points = &self.edge(h.edge)?.points;
        Ok(if h.forward {
            points.clone()
        } else {
            points.iter().rev().copied().collect()
        })
    }

    /// Outgoing half-edges of every enabled node, sorted counter-clockwise.
    fn outgoing_fans(&self) -> Result<HashMap<NodeId, Vec<(f64, HalfEdge)>>> {
        let mut fans: HashMap<NodeId, Vec<(f64, HalfEdge)>> = HashMap::new();
        for (id, edge) in self.edges() {
            if !edge.enabled || !self.node(edge.start)?.enabled || !self.node(edge.end)?.enabled {
                continue;
            }
            let n = edge.points.len();
            if n < 2 {
                return Err(TopologyError::InvalidTopology(format!(
                    "edge with {n} coordinates"
                ))
                .into());
            }
            let forward = HalfEdge { edge: id, forward: true };
            let backward = forward.twin();
            fans.entry(edge.start)
                .or_default()
                .push((direction(&edge.points[0], &edge.points[1]), forward));
            fans.entry(edge.end)
                .or_default()
                .push((direction(&edge.points[n - 1], &edge.points[n - 2]), backward));
        }
        for fan in fans.values_mut() {
            fan.sort_by(|(a, ha), (b, hb)| {
                a.total_cmp(b)
                    .then_with(|| ha.edge.cmp(&hb.edge))
                    .then_with(|| ha.forward.cmp(&hb.forward))
            });
        }
        Ok(fans)
    }

    /// Extracts the bounded faces of the enabled edges.
    ///
    /// Half-edges are walked keeping the face on their left: after arriving
    /// at a node, the walk leaves by the half-edge just clockwise of the
    /// arrival edge's twin. Counter-clockwise rings become polygons.
    /// Clockwise rings become holes of the smallest polygon that strictly
    /// contains them and are dropped otherwise (outer boundaries).
    ///
    /// Edges whose two sides both bound polygons, or whose two sides lie on
    /// the same ring, are tagged [`EdgeTag::Cut`] and reported. A self-loop
    /// that alone bounds one of its sides is never a cut.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::InvalidTopology` if an edge has fewer than two
    /// coordinates or the walk fails to close.
    pub fn build_faces(&mut self) -> Result<Faces> {
        let fans = self.outgoing_fans()?;
        let mut position: HashMap<HalfEdge, (NodeId, usize)> = HashMap::new();
        for (&node, fan) in &fans {
            for (i, &(_, h)) in fan.iter().enumerate() {
                position.insert(h, (node, i));
            }
        }
        let next = |h: HalfEdge| -> Result<HalfEdge> {
            let (node, i) = position
                .get(&h.twin())
                .copied()
                .ok_or(TopologyError::EntityNotFound("half-edge"))?;
            let fan = fans
                .get(&node)
                .ok_or(TopologyError::EntityNotFound("node fan"))?;
            Ok(fan[(i + fan.len() - 1) % fan.len()].1)
        };

        let mut starts: Vec<HalfEdge> = Vec::with_capacity(position.len());
        for (id, _) in self.edges() {
            for forward in [true, false] {
                let h = HalfEdge { edge: id, forward };
                if position.contains_key(&h) {
                    starts.push(h);
                }
            }
        }

        let mut ring_of: HashMap<HalfEdge, usize> = HashMap::new();
        let mut rings: Vec<Ring> = Vec::new();
        for &start in &starts {
            if ring_of.contains_key(&start) {
                continue;
            }
            let index = rings.len();
            let mut points = Vec::new();
            let mut current = start;
            let mut half_edges = 0;
            loop {
                ring_of.insert(current, index);
                let run = self.half_edge_points(current)?;
                points.extend_from_slice(&run[..run.len() - 1]);
                current = next(current)?;
                half_edges += 1;
                if current == start {
                    break;
                }
                if half_edges > starts.len() {
                    return Err(TopologyError::InvalidTopology(
                        "face walk did not close".to_owned(),
                    )
                    .into());
                }
            }
            let area = signed_area_2d(&points);
            rings.push(Ring {
                points,
                area,
                half_edges,
            });
        }

        let min_area = TOLERANCE;
        let mut shells: HashSet<usize> = HashSet::new();
        let mut polygons = Vec::new();
        let mut shapes = Vec::new();
        for (i, ring) in rings.iter().enumerate() {
            if ring.area > min_area {
                shells.insert(i);
                let polygon = Polygon {
                    rings: vec![ring.points.clone()],
                };
                shapes.push((boolean::to_geo(&polygon), ring.area));
                polygons.push(polygon);
            }
        }

        let mut holes = 0;
        for ring in rings.iter().filter(|r| r.area < -min_area) {
            let owner = shapes
                .iter()
                .enumerate()
                .filter(|(_, (shape, area))| {
                    *area > -ring.area
                        && ring.points.iter().all(|p| boolean::intersects_point(shape, p))
                        && ring
                            .points
                            .iter()
                            .any(|p| boolean::contains_point_strictly(shape, p))
                })
                .min_by(|a, b| a.1 .1.total_cmp(&b.1 .1))
                .map(|(i, _)| i);
            if let Some(owner) = owner {
                polygons[owner].rings.push(ring.points.clone());
                holes += 1;
            }
        }

        let mut cut_ids = Vec::new();
        for &h in starts.iter().filter(|h| h.forward) {
            let (Some(&a), Some(&b)) = (ring_of.get(&h), ring_of.get(&h.twin())) else {
                continue;
            };
            // A loop closing a ring on its own separates nothing.
            let lone_loop = self.edge(h.edge)?.is_loop()
                && (rings[a].half_edges == 1 || rings[b].half_edges == 1);
            let bounds_faces = shells.contains(&a) && shells.contains(&b);
            if !lone_loop && (a == b || bounds_faces) {
                cut_ids.push(h.edge);
            }
        }
        let mut cuts = Vec::with_capacity(cut_ids.len());
        for id in cut_ids {
            let edge = self.edge_mut(id)?;
            edge.tag = Some(EdgeTag::Cut);
            cuts.push(edge.points.clone());
        }

        debug!(
            rings = rings.len(),
            polygons = polygons.len(),
            holes,
            cuts = cuts.len(),
            "extracted faces"
        );
        Ok(Faces { polygons, cuts })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::Polyline;
    use crate::topology::GraphOptions;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square_path(x0: f64, y0: f64, size: f64) -> Vec<Point2> {
        vec![
            p(x0, y0),
            p(x0 + size, y0),
            p(x0 + size, y0 + size),
            p(x0, y0 + size),
            p(x0, y0),
        ]
    }

    fn faces(paths: Vec<Vec<Point2>>) -> Faces {
        let mut graph = PlanarGraph::build(&Polyline::new(paths), GraphOptions::default()).unwrap();
        graph.build_faces().unwrap()
    }

    #[test]
    fn single_ring_is_one_face() {
        let f = faces(vec![square_path(0.0, 0.0, 2.0)]);
        assert_eq!(f.polygons.len(), 1);
        assert!(f.cuts.is_empty());
        assert_abs_diff_eq!(f.polygons[0].area(), 4.0, epsilon = 1e-9);
        assert!(signed_area_2d(&f.polygons[0].rings[0]) > 0.0);
    }

    #[test]
    fn shared_edge_is_a_cut() {
        let f = faces(vec![square_path(0.0, 0.0, 1.0), square_path(1.0, 0.0, 1.0)]);
        assert_eq!(f.polygons.len(), 2);
        assert_eq!(f.cuts.len(), 1);
        let cut = &f.cuts[0];
        assert_eq!(cut.len(), 2);
        for v in cut {
            assert_abs_diff_eq!(v.x, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn ring_touching_boundary_at_a_vertex_is_not_a_cut() {
        let diamond = |dy: f64| {
            vec![
                p(2.0, dy),
                p(3.0, 1.0 + dy),
                p(2.0, 2.0 + dy),
                p(1.0, 1.0 + dy),
                p(2.0, dy),
            ]
        };
        for dy in [0.0, 0.5] {
            let f = faces(vec![square_path(0.0, 0.0, 4.0), diamond(dy)]);
            assert_eq!(f.polygons.len(), 2, "offset {dy}");
            assert!(f.cuts.is_empty(), "offset {dy}: {:?}", f.cuts);
            let total: f64 = f.polygons.iter().map(Polygon::area).sum();
            assert_abs_diff_eq!(total, 16.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn nested_ring_becomes_hole() {
        let f = faces(vec![square_path(0.0, 0.0, 10.0), square_path(4.0, 4.0, 2.0)]);
        assert_eq!(f.polygons.len(), 2);
        let outer = f
            .polygons
            .iter()
            .find(|poly| poly.rings.len() == 2)
            .unwrap();
        assert_abs_diff_eq!(outer.area(), 96.0, epsilon = 1e-9);
        assert!(f.cuts.is_empty());
    }

    #[test]
    fn bridge_between_rings_is_a_cut() {
        let mut paths = vec![square_path(0.0, 0.0, 1.0), square_path(3.0, 0.0, 1.0)];
        paths.push(vec![p(1.0, 0.5), p(3.0, 0.5)]);
        let f = faces(paths);
        assert_eq!(f.polygons.len(), 2);
        assert_eq!(f.cuts.len(), 1);
    }

    #[test]
    fn crossing_lines_make_four_faces() {
        crate::testing::init_tracing();
        let mut paths = vec![square_path(0.0, 0.0, 2.0)];
        paths.push(vec![p(1.0, 0.0), p(1.0, 2.0)]);
        paths.push(vec![p(0.0, 1.0), p(2.0, 1.0)]);
        let f = faces(paths);
        assert_eq!(f.polygons.len(), 4);
        assert_eq!(f.cuts.len(), 4);
        for poly in &f.polygons {
            assert_abs_diff_eq!(poly.area(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn disabled_edges_are_ignored() {
        let mut graph = PlanarGraph::build(
            &Polyline::new(vec![square_path(0.0, 0.0, 1.0)]),
            GraphOptions::default(),
        )
        .unwrap();
        graph.set_elements_enabled_state(false);
        let f = graph.build_faces().unwrap();
        assert!(f.polygons.is_empty());
    }
}
