//! Error types for mesh structural validation.

use thiserror::Error;

/// Errors raised by mesh structural validation.
///
/// These indicate defects in the mesh data itself (bad indices), not
/// geometric conditions like degenerate triangles, which the algorithms
/// handle locally.
#[derive(Debug, Error)]
pub enum MeshError {
    /// A face references a vertex index outside the vertex buffer.
    #[error("face {face} references vertex {index} but mesh has {vertex_count} vertices")]
    FaceIndexOutOfBounds {
        /// Index of the offending face.
        face: usize,
        /// The out-of-bounds vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A vertex coordinate is NaN or infinite.
    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex {
        /// Index of the offending vertex.
        index: usize,
    },
}

/// Result type for mesh validation.
pub type MeshResult<T> = std::result::Result<T, MeshError>;
