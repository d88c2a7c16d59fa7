//! Tree-style support generation for 3D printing.
//!
//! Overhanging surfaces of a mesh are detected, sampled, and connected to
//! the build plate (or back onto the model) by a forest of branching
//! trunks. Nearby trunks merge on the way down, so the printed support
//! uses far less material than a dense scaffold under the same overhangs.
//!
//! # Pipeline
//!
//! 1. **Flag** faces whose normal points within the overhang angle of
//!    straight down.
//! 2. **Sample** the flagged surfaces on a dense lattice, dropping points
//!    already at plate level.
//! 3. **Thin** the samples on a voxel grid so leaf density follows the
//!    configured spacing, not the tessellation.
//! 4. **Join** greedily, tallest point first: each support cone either
//!    merges with another cone, drops to the plate, or rests on the mesh,
//!    whichever is cheapest.
//!
//! # Coordinate System
//!
//! Right-handed, z-up: the build plate is the z = 0 plane and gravity
//! points along -Z. Coordinates are treated as millimeters.
//!
//! # Example
//!
//! ```
//! use support_types::{TriMesh, Point3};
//! use support_tree::{generate_supports, SupportParams};
//!
//! // A downward-facing square floating at z = 2.
//! let mesh = TriMesh::from_parts(
//!     vec![
//!         Point3::new(0.0, 0.0, 2.0),
//!         Point3::new(4.0, 0.0, 2.0),
//!         Point3::new(4.0, 4.0, 2.0),
//!         Point3::new(0.0, 4.0, 2.0),
//!     ],
//!     vec![[0, 2, 1], [0, 3, 2]],
//! );
//!
//! let params = SupportParams::default().with_sample_spacing(2.0);
//! let output = generate_supports(&mesh, &params).unwrap();
//!
//! println!("{}", output.stats);
//! assert!(output.stats.leaves > 0);
//! assert!(output.tree.validate().is_ok());
//! ```

// Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod builder;
mod cone;
mod error;
mod frame;
mod generate;
mod overhang;
mod params;
mod result;

// Re-export main types and functions
pub use builder::build_tree;
pub use cone::{Cone, ConeMeet, MeshContact, cone_cone_meet, cone_mesh_meet};
pub use error::{SupportError, SupportResult};
pub use frame::{EdgeTag, Region, TriangleFrame, VertexTag, build_frames};
pub use generate::generate_supports;
pub use overhang::{OverhangSamples, sample_overhangs};
pub use params::SupportParams;
pub use result::{Link, SupportNode, SupportOutput, SupportStats, SupportTree};
