//! Horizontal plane clipping for triangle meshes.
//!
//! Cuts a [`TriMesh`](support_types::TriMesh) at a plane z = height,
//! removing everything below and re-triangulating the faces the plane
//! crosses. Printing pipelines use this to trim geometry that would end up
//! under the build plate.
//!
//! Clipping mutates the mesh in place and only ever appends vertices, so
//! vertex indices issued before the call remain valid afterwards. Clipping
//! an already-clipped mesh at the same height changes nothing.
//!
//! # Example
//!
//! ```
//! use support_clip::clip_below;
//! use support_types::unit_tetrahedron;
//!
//! // Cut the tetrahedron in half; only the tip survives.
//! let mut mesh = unit_tetrahedron();
//! let stats = clip_below(&mut mesh, 0.5).unwrap();
//!
//! println!("{stats}");
//! assert_eq!(stats.dropped, 1); // the base
//! assert_eq!(mesh.face_count(), 3);
//! ```

// Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod clip;
mod error;
mod result;

// Re-export main types and functions
pub use clip::clip_below;
pub use error::{ClipError, ClipResult};
pub use result::ClipStats;
