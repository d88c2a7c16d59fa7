//! Error types for support generation.

use support_types::MeshError;
use thiserror::Error;

/// Errors raised by support generation.
///
/// Recoverable geometric conditions (degenerate triangles, unreachable
/// merge candidates) never surface here; they are handled locally and
/// reported through [`SupportStats`](crate::SupportStats). An `Err` means
/// the inputs were unusable or internal state broke an invariant.
#[derive(Debug, Error)]
pub enum SupportError {
    /// A configuration value is outside its valid range.
    #[error("invalid parameter `{name}` = {value}: must be {requirement}")]
    InvalidParameter {
        /// Name of the offending field on [`SupportParams`](crate::SupportParams).
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// What the value must satisfy.
        requirement: &'static str,
    },

    /// The input mesh failed structural validation.
    #[error("invalid input mesh: {0}")]
    InvalidMesh(#[from] MeshError),

    /// Internal state broke an invariant that holds by construction.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for support generation.
pub type SupportResult<T> = std::result::Result<T, SupportError>;
