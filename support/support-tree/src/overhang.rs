//! Overhang detection and sample-point generation.
//!
//! Flags faces that overhang beyond the printable angle, covers each with a
//! regular grid of surface samples, and thins the combined set on a spatial
//! grid so that overhang area, not triangulation density, decides how many
//! support points a region gets.

use std::f64::consts::FRAC_PI_2;

use support_spatial::downsample_points;
use support_types::{Point3, TriMesh, Triangle, Vector3};
use tracing::debug;

use crate::params::SupportParams;

/// Samples closer to z = 0 than this rest on the build plate already.
const PLATE_EPSILON: f64 = 1e-9;

/// Output of one sampling pass.
#[derive(Debug, Clone)]
pub struct OverhangSamples {
    /// Thinned sample points; each becomes one support leaf.
    pub points: Vec<Point3<f64>>,

    /// Faces flagged as overhangs.
    pub faces_flagged: usize,

    /// Degenerate faces skipped.
    pub degenerate_faces: usize,

    /// Samples generated before thinning.
    pub raw_samples: usize,
}

/// Find the sample points that need support.
///
/// A face with outward unit normal `n` is an overhang when the angle
/// between `n` and straight down is at most `π/2 − overhang_angle`, so a
/// smaller overhang angle flags more faces and `0` flags everything with
/// any downward exposure. Flagged faces are covered with a sub-grid ten
/// times finer than `sample_spacing`, samples already on the plate are
/// dropped, and the rest are thinned to one centroid per `sample_spacing`
/// cell.
#[must_use]
pub fn sample_overhangs(mesh: &TriMesh, params: &SupportParams) -> OverhangSamples {
    let cos_limit = (FRAC_PI_2 - params.overhang_angle).cos();
    let down = Vector3::new(0.0, 0.0, -1.0);
    let step = params.sample_spacing / 10.0;

    let mut raw: Vec<Point3<f64>> = Vec::new();
    let mut faces_flagged = 0;
    let mut degenerate_faces = 0;

    for tri in mesh.triangles() {
        let Some(normal) = tri.normal() else {
            degenerate_faces += 1;
            continue;
        };
        if normal.dot(&down) < cos_limit {
            continue;
        }
        faces_flagged += 1;
        sample_face(&tri, step, &mut raw);
    }

    let raw_samples = raw.len();
    let points = downsample_points(&raw, params.sample_spacing);

    debug!(
        faces_flagged,
        degenerate_faces,
        raw_samples,
        thinned = points.len(),
        "sampled overhangs"
    );

    OverhangSamples {
        points,
        faces_flagged,
        degenerate_faces,
        raw_samples,
    }
}

/// Walk a triangular wedge of grid points over the face: along edge
/// `v0→v1` in `ia` steps, and for each step a proportionate stretch of the
/// edge `v1→v2` direction. Corners themselves are never emitted.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn sample_face(tri: &Triangle, step: f64, out: &mut Vec<Point3<f64>>) {
    let a = tri.v1 - tri.v0;
    let b = tri.v2 - tri.v1;
    let ia = (a.norm() / step).floor() as usize;
    let ib = (b.norm() / step).floor() as usize;

    for j in 0..ia {
        let fj = j as f64 / ia as f64;
        let k_count = (fj * ib as f64).ceil() as usize;
        for k in 0..k_count {
            let point = tri.v0 + a * fj + b * (k as f64 / ib as f64);
            if point.z.abs() >= PLATE_EPSILON {
                out.push(point);
            }
        }
    }
}
