//! Polygon reconstruction from unstructured linework.

use tracing::{debug, trace};

use crate::error::Result;
use crate::geometry::{Polygon, Polyline};
use crate::math::Point2;
use crate::topology::{EdgeTag, GraphOptions, NodeId, PlanarGraph};

/// Output of [`BuildPolygons`].
#[derive(Debug, Clone, Default)]
pub struct Polygonization {
    /// Polygons bounded by the linework.
    pub polygons: Vec<Polygon>,
    /// Linear spurs that close no ring, one coordinate run per graph edge.
    pub dangles: Vec<Vec<Point2>>,
    /// Edges separating two polygons, one coordinate run per graph edge.
    pub cuts: Vec<Vec<Point2>>,
}

/// Builds polygons from a set of paths.
///
/// The paths are noded into a planar graph, linear spurs are peeled off as
/// dangles, and the faces of what remains become polygons.
#[derive(Debug)]
pub struct BuildPolygons<'a> {
    paths: &'a [Vec<Point2>],
    options: GraphOptions,
}

/// Scratch state owned by a single [`BuildPolygons::execute`] call.
struct PolygonizeState {
    graph: PlanarGraph,
    stack: Vec<NodeId>,
}

impl PolygonizeState {
    fn new(paths: &[Vec<Point2>], options: GraphOptions) -> Result<Self> {
        let linework = Polyline::new(paths.to_vec());
        Ok(Self {
            graph: PlanarGraph::build(&linework, options)?,
            stack: Vec::new(),
        })
    }

    /// Disables linear spurs, tagging their edges as dangles.
    fn reduce_dangles(&mut self) -> Result<()> {
        let mut seeds = Vec::new();
        for (id, _) in self.graph.nodes() {
            if self.graph.enabled_degree(id)? == 1 {
                seeds.push(id);
            }
        }
        self.stack = seeds;

        while let Some(node) = self.stack.pop() {
            let data = self.graph.node_mut(node)?;
            if !data.enabled {
                continue;
            }
            data.enabled = false;

            let remaining = self.graph.enabled_edges(node)?;
            let [edge_id] = remaining.as_slice() else {
                continue;
            };
            let edge = self.graph.edge_mut(*edge_id)?;
            edge.enabled = false;
            edge.tag = Some(EdgeTag::Dangle);
            let other = edge.other_end(node);
            trace!(?edge_id, "dangle");

            if self.graph.enabled_degree(other)? == 1 {
                self.stack.push(other);
            }
        }
        Ok(())
    }

    fn dangles(&self) -> Vec<Vec<Point2>> {
        self.graph
            .edges()
            .filter(|(_, e)| e.tag == Some(EdgeTag::Dangle))
            .map(|(_, e)| e.points.clone())
            .collect()
    }
}

impl<'a> BuildPolygons<'a> {
    /// Creates a new polygon builder with default graph options.
    #[must_use]
    pub fn new(paths: &'a [Vec<Point2>]) -> Self {
        Self {
            paths,
            options: GraphOptions::default(),
        }
    }

    /// Sets custom graph options.
    #[must_use]
    pub fn with_options(mut self, options: GraphOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes the polygon reconstruction.
    ///
    /// The input paths are copied; the caller's data is never modified.
    ///
    /// # Errors
    ///
    /// Propagates graph construction and face extraction errors.
    pub fn execute(&self) -> Result<Polygonization> {
        debug!(paths = self.paths.len(), "build polygons");
        let mut state = PolygonizeState::new(self.paths, self.options)?;
        state.reduce_dangles()?;
        let dangles = state.dangles();
        let faces = state.graph.build_faces()?;
        debug!(
            polygons = faces.polygons.len(),
            dangles = dangles.len(),
            cuts = faces.cuts.len(),
            "polygons built"
        );
        Ok(Polygonization {
            polygons: faces.polygons,
            dangles,
            cuts: faces.cuts,
        })
    }
}

/// Builds polygons, dangles and cuts from `paths`.
///
/// # Errors
///
/// See [`BuildPolygons::execute`].
pub fn build_polygons(paths: &[Vec<Point2>]) -> Result<Polygonization> {
    BuildPolygons::new(paths).execute()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::math::polygon_2d::signed_area_2d;

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

    #[test]
    fn closed_ring_is_one_polygon() {
        let result = build_polygons(&[square_path(0.0, 0.0, 3.0)]).unwrap();
        assert_eq!(result.polygons.len(), 1);
        assert!(result.dangles.is_empty());
        assert!(result.cuts.is_empty());
        assert_abs_diff_eq!(result.polygons[0].area(), 9.0, epsilon = 1e-9);
    }

    #[test]
    fn open_path_is_one_dangle() {
        let path = vec![p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0), p(3.0, 1.0)];
        let result = build_polygons(&[path.clone()]).unwrap();
        assert!(result.polygons.is_empty());
        assert!(result.cuts.is_empty());
        assert_eq!(result.dangles.len(), 1);
        let dangle = &result.dangles[0];
        assert_eq!(dangle.len(), path.len());
        let mut ends = [dangle[0], dangle[dangle.len() - 1]];
        ends.sort_by(|a, b| a.x.total_cmp(&b.x));
        assert_eq!(ends, [path[0], path[3]]);
    }

    #[test]
    fn shared_edge_is_reported_as_cut() {
        let result =
            build_polygons(&[square_path(0.0, 0.0, 1.0), square_path(1.0, 0.0, 1.0)]).unwrap();
        assert_eq!(result.polygons.len(), 2);
        assert!(result.dangles.is_empty());
        assert_eq!(result.cuts.len(), 1);
        let mut cut = result.cuts[0].clone();
        cut.sort_by(|a, b| a.y.total_cmp(&b.y));
        assert_eq!(cut, vec![p(1.0, 0.0), p(1.0, 1.0)]);
    }

    #[test]
    fn spur_on_a_ring_is_peeled() {
        let ring = square_path(0.0, 0.0, 2.0);
        let spur = vec![p(2.0, 1.0), p(3.0, 1.0), p(4.0, 2.0)];
        let result = build_polygons(&[ring, spur]).unwrap();
        assert_eq!(result.polygons.len(), 1);
        assert_eq!(result.dangles.len(), 1);
        assert_eq!(result.dangles[0].len(), 3);
        assert!(result.cuts.is_empty());
    }

    #[test]
    fn branching_spurs_peel_completely() {
        let paths = vec![
            vec![p(0.0, 0.0), p(1.0, 0.0)],
            vec![p(1.0, 0.0), p(2.0, 1.0)],
            vec![p(1.0, 0.0), p(2.0, -1.0)],
        ];
        let result = build_polygons(&paths).unwrap();
        assert!(result.polygons.is_empty());
        assert_eq!(result.dangles.len(), 3);
    }

    #[test]
    fn crossing_strokes_form_a_face() {
        crate::testing::init_tracing();
        // Four strokes overshooting each other like a hash sign.
        let paths = vec![
            vec![p(-1.0, 0.0), p(3.0, 0.0)],
            vec![p(-1.0, 2.0), p(3.0, 2.0)],
            vec![p(0.0, -1.0), p(0.0, 3.0)],
            vec![p(2.0, -1.0), p(2.0, 3.0)],
        ];
        let result = build_polygons(&paths).unwrap();
        assert_eq!(result.polygons.len(), 1);
        assert_eq!(result.dangles.len(), 8);
        let ring = &result.polygons[0].rings[0];
        assert!(signed_area_2d(ring) > 0.0);
        assert_abs_diff_eq!(result.polygons[0].area(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn input_paths_are_untouched() {
        let paths = vec![square_path(0.0, 0.0, 1.0)];
        let before = paths.clone();
        let _ = build_polygons(&paths).unwrap();
        assert_eq!(paths, before);
    }
}
