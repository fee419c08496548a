//! Buffer (offset region) construction.
//!
//! Every input is broken down into per-point circles and per-segment
//! capsules ("pre-buffers"). These are unioned in small batches and the
//! batch results are merged by a fork-join tree reduction.

mod merge;
mod prebuffer;

pub use merge::{fork_join_reduce, MergeParams};

use std::f64::consts::PI;

use geo::MultiPolygon;
use tracing::debug;

use crate::error::{GeometryError, OperationError, PlanarError, Result};
use crate::geometry::{boolean, segments_of, Geometry, GeometryKind, MultiPoint, Polygon, Polyline};
use crate::math::Point2;

use prebuffer::{point_circle, segment_capsule};

/// Parameters for [`Buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferParams {
    /// Vertices per full circle approximation. Must be at least 3.
    pub points_per_circle: usize,
    /// Whether partial buffers may be merged on the rayon pool.
    pub allow_parallels: bool,
    /// Number of pre-buffers unioned into one partial buffer.
    pub batch_size: usize,
    /// Fork-join merge knobs.
    pub merge: MergeParams,
}

impl Default for BufferParams {
    fn default() -> Self {
        Self {
            points_per_circle: 32,
            allow_parallels: true,
            batch_size: 3,
            merge: MergeParams::default(),
        }
    }
}

/// Computes the buffer of a geometry at a given distance.
///
/// A positive distance grows the geometry; a negative one erodes it and is
/// only accepted for polygons. The result of a non-zero buffer is always a
/// [`Geometry::Polygon`]; a zero distance returns a copy of the input.
#[derive(Debug)]
pub struct Buffer<'a> {
    geometry: &'a Geometry,
    distance: f64,
    params: BufferParams,
}

impl<'a> Buffer<'a> {
    /// Creates a new buffer operation with default parameters.
    #[must_use]
    pub fn new(geometry: &'a Geometry, distance: f64) -> Self {
        Self {
            geometry,
            distance,
            params: BufferParams::default(),
        }
    }

    /// Sets custom buffer parameters.
    #[must_use]
    pub fn with_params(mut self, params: BufferParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the buffer operation.
    ///
    /// # Errors
    ///
    /// - `GeometryError::UnsupportedGeometryType` for kinds other than point,
    ///   polyline, polygon and multipoint
    /// - `OperationError::InvalidArgument` if `points_per_circle <= 2`,
    ///   `batch_size == 0`, the merge fan-out is below 2, the distance is
    ///   not finite, or a negative distance is given for a non-polygon.
    ///   A zero distance returns the copy before any parameter is checked.
    pub fn execute(&self) -> Result<Geometry> {
        let kind = self.geometry.kind();
        if kind == GeometryKind::Segment {
            return Err(unsupported(kind));
        }
        if self.distance == 0.0 {
            return Ok(self.geometry.clone());
        }
        self.validate_params()?;
        if !self.distance.is_finite() {
            return Err(OperationError::InvalidArgument(format!(
                "buffer distance must be finite, got {}",
                self.distance
            ))
            .into());
        }
        if self.distance < 0.0 && kind != GeometryKind::Polygon {
            return Err(OperationError::InvalidArgument(format!(
                "negative buffer distance is only supported for polygons, got {kind:?}"
            ))
            .into());
        }

        debug!(
            ?kind,
            distance = self.distance,
            points_per_circle = self.params.points_per_circle,
            parallel = self.params.allow_parallels,
            "buffer"
        );
        let polygon = match self.geometry {
            Geometry::Point(p) => Polygon {
                rings: vec![point_circle(p, self.radius(), self.params.points_per_circle)],
            },
            Geometry::Polyline(polyline) => self.buffer_polyline(polyline),
            Geometry::Polygon(polygon) => self.buffer_polygon(polygon),
            Geometry::MultiPoint(points) => self.buffer_multipoint(points),
            Geometry::Segment(_) => return Err(unsupported(kind)),
        };
        Ok(Geometry::Polygon(polygon))
    }

    fn validate_params(&self) -> Result<()> {
        if self.params.points_per_circle <= 2 {
            return Err(OperationError::InvalidArgument(format!(
                "points per circle must be at least 3, got {}",
                self.params.points_per_circle
            ))
            .into());
        }
        if self.params.batch_size == 0 {
            return Err(
                OperationError::InvalidArgument("buffer batch size must be positive".to_owned())
                    .into(),
            );
        }
        self.params.merge.validate()
    }

    fn radius(&self) -> f64 {
        self.distance.abs()
    }

    /// Chordal error of the circle approximation, used as the weeding
    /// tolerance.
    fn weed_tolerance(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let n = self.params.points_per_circle as f64;
        self.radius() * (1.0 - (PI / n).cos())
    }

    fn ring_shape(ring: Vec<Point2>) -> MultiPolygon<f64> {
        boolean::to_geo(&Polygon { rings: vec![ring] })
    }

    fn merge(&self, shapes: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
        let count = shapes.len();
        let partials = merge::accumulate(shapes, self.params.batch_size);
        debug!(shapes = count, partials = partials.len(), "merging pre-buffers");
        merge::merge_partials(partials, self.params.allow_parallels, &self.params.merge)
            .unwrap_or_else(|| MultiPolygon::new(Vec::new()))
    }

    fn buffer_polygon(&self, polygon: &Polygon) -> Polygon {
        let mut source = polygon.clone();
        source.weed(self.weed_tolerance());
        source.simplify();
        if source.is_empty() {
            return Polygon::default();
        }

        let (radius, n) = (self.radius(), self.params.points_per_circle);
        let shapes = source
            .segments()
            .filter(|s| s.v1 != s.v2)
            .map(|s| Self::ring_shape(segment_capsule(&s, radius, n, true)))
            .collect();
        let boundary = boolean::from_geo(&self.merge(shapes));

        let result = if self.distance > 0.0 {
            source.union(&boundary)
        } else {
            source.difference(&boundary)
        };
        result
            .into_iter()
            .find_map(|g| match g {
                Geometry::Polygon(p) => Some(p),
                _ => None,
            })
            .unwrap_or_default()
    }

    fn buffer_polyline(&self, polyline: &Polyline) -> Polygon {
        let mut source = polyline.clone();
        source.weed(self.weed_tolerance());

        let (radius, n) = (self.radius(), self.params.points_per_circle);
        let mut shapes = Vec::new();
        for path in &source.paths {
            if let [single] = path.as_slice() {
                shapes.push(Self::ring_shape(point_circle(single, radius, n)));
                continue;
            }
            for (i, segment) in segments_of(path, false).enumerate() {
                if segment.v1 == segment.v2 {
                    continue;
                }
                shapes.push(Self::ring_shape(segment_capsule(&segment, radius, n, i == 0)));
            }
        }
        boolean::from_geo(&self.merge(shapes))
    }

    fn buffer_multipoint(&self, points: &MultiPoint) -> Polygon {
        let (radius, n) = (self.radius(), self.params.points_per_circle);
        let shapes = points
            .points
            .iter()
            .map(|p| Self::ring_shape(point_circle(p, radius, n)))
            .collect();
        boolean::from_geo(&self.merge(shapes))
    }
}

fn unsupported(kind: GeometryKind) -> PlanarError {
    GeometryError::UnsupportedGeometryType {
        operation: "buffer",
        kind,
    }
    .into()
}

/// Buffers `geometry` at `distance`.
///
/// # Errors
///
/// See [`Buffer::execute`].
pub fn get_buffer(
    geometry: &Geometry,
    distance: f64,
    points_per_circle: usize,
    allow_parallels: bool,
) -> Result<Geometry> {
    Buffer::new(geometry, distance)
        .with_params(BufferParams {
            points_per_circle,
            allow_parallels,
            ..BufferParams::default()
        })
        .execute()
}
