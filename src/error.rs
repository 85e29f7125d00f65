use thiserror::Error;

/// Errors raised by [Graph](crate::Graph) lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node was queried that was never inserted. This indicates a broken topology rather
    /// than an unreachable target, which is reported as an empty path instead.
    #[error("node {0} is not part of the graph")]
    MissingNode(String),
}

impl GraphError {
    pub(crate) fn missing<N: std::fmt::Debug>(node: &N) -> GraphError {
        GraphError::MissingNode(format!("{:?}", node))
    }
}

/// Errors raised while constructing a [Grid](crate::Grid).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("cell size must be positive and finite, got ({x}, {y})")]
    InvalidCellSize { x: f32, y: f32 },
}
