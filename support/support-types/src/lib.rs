//! Core mesh types for Trellis.
//!
//! This crate provides the foundational types shared by the support
//! generation pipeline:
//!
//! - [`TriMesh`] - An indexed triangle mesh
//! - [`Triangle`] - A concrete triangle with corner positions
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`MeshError`] - Structural validation errors
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//! Downstream crates (support-tree, support-clip) assume millimeters.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system** with Z up: the build plate is
//! the z = 0 plane and gravity points along -Z. Face winding is
//! **counter-clockwise (CCW) when viewed from outside**, so normals point
//! outward by the right-hand rule.
//!
//! # Example
//!
//! ```
//! use support_types::{TriMesh, Point3};
//!
//! // Create a single-triangle mesh
//! let mut mesh = TriMesh::new();
//! mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(mesh.validate().is_ok());
//! ```

// Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bounds;
mod error;
mod mesh;
mod triangle;

// Re-export core types
pub use bounds::Aabb;
pub use error::{MeshError, MeshResult};
pub use mesh::{TriMesh, unit_cube, unit_tetrahedron};
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
