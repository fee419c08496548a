pub mod buffer;
pub mod chain;
pub mod distance;
pub mod polygonize;

pub use buffer::{get_buffer, Buffer, BufferParams, MergeParams};
pub use distance::{euclidean_distance, minimum_euclidean_distance, EuclideanDistance};
pub use polygonize::{build_polygons, BuildPolygons, Polygonization};
