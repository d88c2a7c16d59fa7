//! Spatial-grid point downsampling for Trellis.
//!
//! The overhang sampler oversamples triangle surfaces on purpose and then
//! thins the result here: points are binned into an axis-aligned voxel grid
//! and each occupied cell is replaced by the centroid of its points.
//!
//! The output is deterministic for a fixed input: cells are emitted in the
//! order they are first touched, so the same point list and cell size always
//! produce the same thinned list, element order included.
//!
//! # Example
//!
//! ```
//! use nalgebra::Point3;
//! use support_spatial::downsample_points;
//!
//! let points = vec![
//!     Point3::new(0.1, 0.1, 0.0),
//!     Point3::new(0.2, 0.2, 0.0), // same cell as the first
//!     Point3::new(5.0, 0.0, 0.0), // different cell
//! ];
//!
//! let thinned = downsample_points(&points, 1.0);
//! assert_eq!(thinned.len(), 2);
//! ```

// Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod cell;
mod downsample;

pub use cell::CellKey;
pub use downsample::downsample_points;
