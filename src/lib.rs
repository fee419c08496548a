pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod topology;

pub use error::{PlanarError, Result};
pub use geometry::{Geometry, GeometryKind, MultiPoint, Polygon, Polyline};
pub use operations::buffer::get_buffer;
pub use operations::distance::{euclidean_distance, minimum_euclidean_distance};
pub use operations::polygonize::build_polygons;
