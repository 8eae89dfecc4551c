//! Error type shared by every fallible operation of the crate.

use thiserror::Error;

/// Errors raised while assembling, partitioning or traversing a model.
///
/// Near-degenerate numerics (parallel planes, tiny cross products) are not
/// errors: they are resolved through [`Tolerance`](crate::Tolerance)
/// thresholds during classification.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BspError {
    /// A strip with fewer than three vertices, an index group pointing past
    /// the vertex store, or an unparsable vertex component.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A triangle lookup outside a strip's (or the model's) valid range.
    #[error("Triangle ({part}, {sub_index}) is out of range (length {len})")]
    IndexOutOfRange {
        part: usize,
        sub_index: usize,
        len: usize,
    },

    /// A zero-length normal or direction where a division is required.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Traversal requested before a BSP tree was built.
    #[error("No BSP tree has been built for this model")]
    EmptyTree,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BspError>;
