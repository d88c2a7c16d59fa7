//! Clipping a mesh against a horizontal plane.

use support_types::{Point3, TriMesh};
use tracing::debug;

use crate::error::{ClipError, ClipResult};
use crate::result::ClipStats;

/// Where a vertex sits relative to the cutting plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Above,
    On,
    Below,
}

fn side_of(z: f64, height: f64) -> Side {
    if z > height {
        Side::Above
    } else if z < height {
        Side::Below
    } else {
        Side::On
    }
}

/// Remove everything strictly below the plane z = `height`, re-triangulating
/// faces the plane crosses.
///
/// Faces classify by their vertices: with no vertex strictly above, the
/// face is dropped (this removes faces lying flat in the plane); with no
/// vertex strictly below, it is kept unchanged. A face the plane genuinely
/// crosses is replaced by its surviving part, split around the midpoint of
/// the surviving edge when two vertices are above. Intersection vertices
/// sit at exactly z = `height`, so a second clip at the same height is a
/// no-op.
///
/// Vertices are only ever appended, never moved or removed, so vertex
/// indices issued before the call stay valid. Cut-off vertices remain in
/// the buffer unreferenced.
///
/// # Errors
///
/// Returns [`ClipError::NonFiniteHeight`] for a NaN or infinite `height`
/// and [`ClipError::InvalidMesh`] if the mesh fails structural validation.
///
/// # Example
///
/// ```
/// use support_clip::clip_below;
/// use support_types::unit_cube;
///
/// let mut mesh = unit_cube();
/// let stats = clip_below(&mut mesh, 0.5).unwrap();
///
/// assert_eq!(stats.dropped, 2); // the bottom faces
/// assert!(mesh.vertices.iter().all(|v| v.z >= 0.0));
/// assert!(mesh.validate().is_ok());
/// ```
pub fn clip_below(mesh: &mut TriMesh, height: f64) -> ClipResult<ClipStats> {
    if !height.is_finite() {
        return Err(ClipError::NonFiniteHeight { value: height });
    }
    mesh.validate()?;

    let mut stats = ClipStats::default();
    let vertices_before = mesh.vertices.len();
    let faces = std::mem::take(&mut mesh.faces);

    for face in faces {
        let sides = face.map(|i| side_of(mesh.vertices[i as usize].z, height));
        let above = sides.iter().filter(|&&s| s == Side::Above).count();
        let below = sides.iter().filter(|&&s| s == Side::Below).count();

        if above == 0 {
            stats.dropped += 1;
            continue;
        }
        if below == 0 {
            mesh.faces.push(face);
            stats.kept += 1;
            continue;
        }

        if above == 2 {
            split_two_above(mesh, face, &sides, height);
            stats.split_two_above += 1;
        } else {
            split_one_above(mesh, face, &sides, height);
            stats.split_one_above += 1;
        }
    }

    stats.vertices_added = mesh.vertices.len() - vertices_before;
    debug!(
        kept = stats.kept,
        dropped = stats.dropped,
        split = stats.split(),
        vertices_added = stats.vertices_added,
        "mesh clipped"
    );
    Ok(stats)
}

/// Cut a face with a single above-vertex down to its surviving corner.
///
/// The triple keeps its positions: each below-vertex is swapped for the
/// crossing point on its edge toward the above-vertex and an on-plane
/// vertex stays in place, so the parent's winding carries over.
fn split_one_above(mesh: &mut TriMesh, face: [u32; 3], sides: &[Side; 3], height: f64) {
    let k = sides.iter().position(|&s| s == Side::Above).unwrap_or(0);
    let apex = mesh.vertices[face[k] as usize];

    let mut tri = face;
    for step in [1, 2] {
        let j = (k + step) % 3;
        if sides[j] == Side::Below {
            let below = mesh.vertices[face[j] as usize];
            tri[j] = push_intersection(&mut mesh.vertices, apex, below, height);
        }
    }
    mesh.faces.push(tri);
}

/// Replace a face with a single below-vertex by three triangles fanned
/// around the midpoint of its surviving edge.
fn split_two_above(mesh: &mut TriMesh, face: [u32; 3], sides: &[Side; 3], height: f64) {
    let k = sides.iter().position(|&s| s == Side::Below).unwrap_or(0);
    let below = mesh.vertices[face[k] as usize];

    let a0 = face[(k + 1) % 3];
    let a1 = face[(k + 2) % 3];
    let p0 = mesh.vertices[a0 as usize];
    let p1 = mesh.vertices[a1 as usize];

    // The surviving region is the pentagon e0 -> a0 -> m -> a1 -> e1 in
    // the parent's cyclic order; fanning it around m keeps that winding.
    let e0 = push_intersection(&mut mesh.vertices, p0, below, height);
    let e1 = push_intersection(&mut mesh.vertices, p1, below, height);
    let m = push_vertex(
        &mut mesh.vertices,
        Point3::new(
            f64::midpoint(p0.x, p1.x),
            f64::midpoint(p0.y, p1.y),
            f64::midpoint(p0.z, p1.z),
        ),
    );

    mesh.faces.push([m, e0, a0]);
    mesh.faces.push([m, e1, e0]);
    mesh.faces.push([m, a1, e1]);
}

/// Append where the segment from `above` to `below` crosses the plane.
/// The z coordinate is snapped to exactly `height`.
fn push_intersection(
    vertices: &mut Vec<Point3<f64>>,
    above: Point3<f64>,
    below: Point3<f64>,
    height: f64,
) -> u32 {
    // The denominator is nonzero: the endpoints sit strictly on opposite
    // sides of the plane.
    let t = (height - above.z) / (below.z - above.z);
    push_vertex(
        vertices,
        Point3::new(
            above.x + t * (below.x - above.x),
            above.y + t * (below.y - above.y),
            height,
        ),
    )
}

#[allow(clippy::cast_possible_truncation)]
fn push_vertex(vertices: &mut Vec<Point3<f64>>, point: Point3<f64>) -> u32 {
    let index = vertices.len() as u32;
    vertices.push(point);
    index
}
