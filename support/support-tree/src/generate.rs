//! The end-to-end support-generation pipeline.

use support_types::TriMesh;
use tracing::info;

use crate::builder::build_tree;
use crate::error::SupportResult;
use crate::frame::build_frames;
use crate::overhang::sample_overhangs;
use crate::params::SupportParams;
use crate::result::SupportOutput;

/// Generate a support forest for every overhang of `mesh`.
///
/// Runs the full pipeline: flag faces steeper than the overhang angle,
/// sample and thin their surfaces, then greedily join the sampled points
/// into trunks that end on the build plate or rest on the model itself.
///
/// The mesh must sit on or above the build plate (z = 0) in a z-up frame.
/// A mesh with no overhangs yields an empty tree and is not an error.
///
/// # Errors
///
/// Returns [`InvalidParameter`](crate::SupportError::InvalidParameter) if
/// `params` fail validation,
/// [`InvalidMesh`](crate::SupportError::InvalidMesh) if the mesh has
/// out-of-range face indices or non-finite vertices, and
/// [`InvariantViolation`](crate::SupportError::InvariantViolation) if the
/// built tree fails its structural checks.
///
/// # Example
///
/// ```
/// use support_types::{TriMesh, Point3};
/// use support_tree::{generate_supports, SupportParams};
///
/// // A downward-facing square floating above the plate.
/// let mesh = TriMesh::from_parts(
///     vec![
///         Point3::new(0.0, 0.0, 2.0),
///         Point3::new(4.0, 0.0, 2.0),
///         Point3::new(4.0, 4.0, 2.0),
///         Point3::new(0.0, 4.0, 2.0),
///     ],
///     vec![[0, 2, 1], [0, 3, 2]],
/// );
///
/// let output = generate_supports(&mesh, &SupportParams::default()).unwrap();
/// assert!(output.stats.leaves > 0);
/// assert!(output.stats.plate_anchors > 0);
/// ```
pub fn generate_supports(mesh: &TriMesh, params: &SupportParams) -> SupportResult<SupportOutput> {
    params.validate()?;
    mesh.validate()?;

    let sampled = sample_overhangs(mesh, params);
    info!(
        faces_flagged = sampled.faces_flagged,
        raw_samples = sampled.raw_samples,
        leaves = sampled.points.len(),
        "overhang sampling complete"
    );

    let frames = build_frames(mesh);
    let (tree, mut stats) = build_tree(sampled.points, &frames, params);
    stats.faces_flagged = sampled.faces_flagged;
    stats.degenerate_faces = sampled.degenerate_faces;
    stats.raw_samples = sampled.raw_samples;

    tree.validate()?;

    info!(
        junctions = stats.junctions(),
        discarded = stats.discarded,
        "support forest built"
    );

    Ok(SupportOutput { tree, stats })
}

#[cfg(test)]
mod tests {
    use support_types::{Point3, unit_cube};

    use crate::error::SupportError;

    use super::*;

    #[test]
    fn rejects_invalid_params() {
        let params = SupportParams::default().with_sample_spacing(0.0);
        let err = generate_supports(&unit_cube(), &params);
        assert!(matches!(
            err,
            Err(SupportError::InvalidParameter { name, .. }) if name == "sample_spacing"
        ));
    }

    #[test]
    fn rejects_invalid_mesh() {
        let mesh = TriMesh::from_parts(vec![Point3::new(0.0, 0.0, f64::NAN)], Vec::new());
        let err = generate_supports(&mesh, &SupportParams::default());
        assert!(matches!(err, Err(SupportError::InvalidMesh(_))));
    }

    #[test]
    fn grounded_cube_needs_no_supports() {
        // The cube's down-facing faces all sit on the plate already.
        let output = generate_supports(&unit_cube(), &SupportParams::default())
            .expect("cube generates cleanly");

        assert_eq!(output.stats.faces_flagged, 2);
        assert_eq!(output.stats.leaves, 0);
        assert!(output.tree.is_empty());
    }
}
