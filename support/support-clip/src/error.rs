//! Error types for plane clipping.

use support_types::MeshError;
use thiserror::Error;

/// Errors raised by plane clipping.
///
/// Faces the plane merely touches are handled by the classification rules,
/// not reported here. An `Err` means the inputs were unusable.
#[derive(Debug, Error)]
pub enum ClipError {
    /// The cutting height is NaN or infinite.
    #[error("cutting height {value} is not finite")]
    NonFiniteHeight {
        /// The rejected height.
        value: f64,
    },

    /// The input mesh failed structural validation.
    #[error("invalid input mesh: {0}")]
    InvalidMesh(#[from] MeshError),
}

/// Result type for plane clipping.
pub type ClipResult<T> = std::result::Result<T, ClipError>;
