use thiserror::Error;

use crate::geometry::GeometryKind;

/// Top-level error type for the planar geometry engine.
#[derive(Debug, Error)]
pub enum PlanarError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric inputs.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("{operation} does not support geometry kind {kind:?}")]
    UnsupportedGeometryType {
        operation: &'static str,
        kind: GeometryKind,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors raised by the planar graph.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to operation arguments and execution.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for results using [`PlanarError`].
pub type Result<T> = std::result::Result<T, PlanarError>;
