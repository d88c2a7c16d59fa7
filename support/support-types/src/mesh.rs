//! Indexed triangle mesh.

use crate::{Aabb, MeshError, MeshResult, Triangle};
use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// This is the primary mesh type for Trellis. Vertices and faces are stored
/// separately, with faces referencing vertices by index. The support
/// pipeline treats the mesh as immutable input; the plane clipper mutates it
/// in place by appending vertices and rebuilding the face list (existing
/// vertices are never moved or removed, so issued indices stay valid).
///
/// # Winding Order
///
/// Faces use **counter-clockwise (CCW) winding** when viewed from outside.
/// Normals point outward by the right-hand rule.
///
/// # Example
///
/// ```
/// use support_types::{TriMesh, Point3};
///
/// let mut mesh = TriMesh::new();
/// mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,

    /// Triangle faces as indices into the vertex array.
    /// Each face is `[v0, v1, v2]` with counter-clockwise winding.
    pub faces: Vec<[u32; 3]>,
}

impl TriMesh {
    /// Create a new empty mesh.
    ///
    /// # Example
    ///
    /// ```
    /// use support_types::TriMesh;
    ///
    /// let mesh = TriMesh::new();
    /// assert!(mesh.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    ///
    /// # Example
    ///
    /// ```
    /// use support_types::{TriMesh, Point3};
    ///
    /// let vertices = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ];
    /// let mesh = TriMesh::from_parts(vertices, vec![[0, 1, 2]]);
    /// assert_eq!(mesh.face_count(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from raw coordinate and index data.
    ///
    /// Returns an empty mesh if either slice's length is not divisible by 3.
    ///
    /// # Example
    ///
    /// ```
    /// use support_types::TriMesh;
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let mesh = TriMesh::from_raw(&positions, &[0, 1, 2]);
    /// assert_eq!(mesh.vertex_count(), 3);
    /// ```
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new();
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();

        let faces = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();

        Self { vertices, faces }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether the mesh has no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Get the triangle for a face, or `None` if the face index or any of
    /// its vertex indices is out of range.
    #[must_use]
    pub fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let &[i0, i1, i2] = self.faces.get(face_index)?;
        Some(Triangle {
            v0: *self.vertices.get(i0 as usize)?,
            v1: *self.vertices.get(i1 as usize)?,
            v2: *self.vertices.get(i2 as usize)?,
        })
    }

    /// Iterate over all faces as concrete triangles, skipping faces whose
    /// vertex indices are out of range.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.faces.len()).filter_map(move |i| self.triangle(i))
    }

    /// Check structural invariants: every face index must reference a valid
    /// vertex and every coordinate must be finite.
    ///
    /// A violation here is a defect in the mesh data, not a recoverable
    /// geometric condition, so callers are expected to fail fast on `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::FaceIndexOutOfBounds`] or
    /// [`MeshError::NonFiniteVertex`] for the first violation found.
    pub fn validate(&self) -> MeshResult<()> {
        for (i, v) in self.vertices.iter().enumerate() {
            if !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()) {
                return Err(MeshError::NonFiniteVertex { index: i });
            }
        }

        let vertex_count = self.vertices.len();
        for (f, face) in self.faces.iter().enumerate() {
            for &index in face {
                if index as usize >= vertex_count {
                    return Err(MeshError::FaceIndexOutOfBounds {
                        face: f,
                        index,
                        vertex_count,
                    });
                }
            }
        }

        Ok(())
    }

    /// Axis-aligned bounding box of all vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        if self.vertices.is_empty() {
            return Aabb::empty();
        }
        Aabb::from_points(self.vertices.iter())
    }

    /// Merge another mesh into this one.
    ///
    /// The other mesh's vertices and faces are appended, with face indices
    /// offset so they keep referencing the right vertices. Used to combine
    /// generated support geometry with the model it supports.
    ///
    /// # Note
    ///
    /// Face indices are u32, so meshes beyond ~4 billion vertices are
    /// unsupported by design.
    #[allow(clippy::cast_possible_truncation)]
    pub fn merge(&mut self, other: &Self) {
        let vertex_offset = self.vertices.len() as u32;

        self.vertices.extend(other.vertices.iter().copied());

        for face in &other.faces {
            self.faces.push([
                face[0] + vertex_offset,
                face[1] + vertex_offset,
                face[2] + vertex_offset,
            ]);
        }
    }
}

/// Create a unit cube mesh from (0,0,0) to (1,1,1) with outward normals.
///
/// # Example
///
/// ```
/// use support_types::unit_cube;
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> TriMesh {
    let mut mesh = TriMesh::with_capacity(8, 12);

    mesh.vertices.push(Point3::new(0.0, 0.0, 0.0)); // 0
    mesh.vertices.push(Point3::new(1.0, 0.0, 0.0)); // 1
    mesh.vertices.push(Point3::new(1.0, 1.0, 0.0)); // 2
    mesh.vertices.push(Point3::new(0.0, 1.0, 0.0)); // 3
    mesh.vertices.push(Point3::new(0.0, 0.0, 1.0)); // 4
    mesh.vertices.push(Point3::new(1.0, 0.0, 1.0)); // 5
    mesh.vertices.push(Point3::new(1.0, 1.0, 1.0)); // 6
    mesh.vertices.push(Point3::new(0.0, 1.0, 1.0)); // 7

    // Bottom (z=0), normal -Z
    mesh.faces.push([0, 2, 1]);
    mesh.faces.push([0, 3, 2]);
    // Top (z=1), normal +Z
    mesh.faces.push([4, 5, 6]);
    mesh.faces.push([4, 6, 7]);
    // Front (y=0), normal -Y
    mesh.faces.push([0, 1, 5]);
    mesh.faces.push([0, 5, 4]);
    // Back (y=1), normal +Y
    mesh.faces.push([3, 7, 6]);
    mesh.faces.push([3, 6, 2]);
    // Left (x=0), normal -X
    mesh.faces.push([0, 4, 7]);
    mesh.faces.push([0, 7, 3]);
    // Right (x=1), normal +X
    mesh.faces.push([1, 2, 6]);
    mesh.faces.push([1, 6, 5]);

    mesh
}

/// Create a tetrahedron with a unit-square base on z = 0 and its apex at
/// (0.5, 0.5, 1), with outward normals.
///
/// # Example
///
/// ```
/// use support_types::unit_tetrahedron;
///
/// let tet = unit_tetrahedron();
/// assert_eq!(tet.vertex_count(), 4);
/// assert_eq!(tet.face_count(), 4);
/// ```
#[must_use]
pub fn unit_tetrahedron() -> TriMesh {
    let mut mesh = TriMesh::with_capacity(4, 4);

    mesh.vertices.push(Point3::new(0.0, 0.0, 0.0)); // 0
    mesh.vertices.push(Point3::new(1.0, 0.0, 0.0)); // 1
    mesh.vertices.push(Point3::new(0.5, 1.0, 0.0)); // 2
    mesh.vertices.push(Point3::new(0.5, 0.5, 1.0)); // 3 apex

    // Base (z=0), normal -Z
    mesh.faces.push([0, 2, 1]);
    // Sides, CCW from outside
    mesh.faces.push([0, 1, 3]);
    mesh.faces.push([1, 2, 3]);
    mesh.faces.push([2, 0, 3]);

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_is_empty() {
        let mesh = TriMesh::new();
        assert!(mesh.is_empty());

        let mut mesh2 = TriMesh::new();
        mesh2.vertices.push(Point3::new(0.0, 0.0, 0.0));
        assert!(mesh2.is_empty()); // no faces

        mesh2.faces.push([0, 0, 0]);
        assert!(!mesh2.is_empty());
    }

    #[test]
    fn mesh_from_raw() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let mesh = TriMesh::from_raw(&positions, &[0, 1, 2]);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);

        // Ragged input yields an empty mesh
        let bad = TriMesh::from_raw(&positions[..7], &[0, 1, 2]);
        assert!(bad.is_empty());
    }

    #[test]
    fn validate_accepts_cube() {
        assert!(unit_cube().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_index() {
        let mut mesh = TriMesh::new();
        mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
        mesh.faces.push([0, 0, 5]);

        match mesh.validate() {
            Err(MeshError::FaceIndexOutOfBounds { face, index, .. }) => {
                assert_eq!(face, 0);
                assert_eq!(index, 5);
            }
            other => panic!("expected FaceIndexOutOfBounds, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_nan_vertex() {
        let mut mesh = TriMesh::new();
        mesh.vertices.push(Point3::new(0.0, f64::NAN, 0.0));

        assert!(matches!(
            mesh.validate(),
            Err(MeshError::NonFiniteVertex { index: 0 })
        ));
    }

    #[test]
    fn mesh_bounds() {
        let mut mesh = TriMesh::new();
        mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
        mesh.vertices.push(Point3::new(10.0, 5.0, 3.0));
        mesh.vertices.push(Point3::new(-2.0, 8.0, 1.0));

        let bounds = mesh.bounds();
        assert!((bounds.min.x - (-2.0)).abs() < f64::EPSILON);
        assert!((bounds.max.x - 10.0).abs() < f64::EPSILON);
        assert!((bounds.max.y - 8.0).abs() < f64::EPSILON);
        assert!((bounds.max.z - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_mesh_bounds() {
        assert!(TriMesh::new().bounds().is_empty());
    }

    #[test]
    fn mesh_merge_offsets_indices() {
        let mut mesh1 = TriMesh::from_raw(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            &[0, 1, 2],
        );
        let mesh2 = TriMesh::from_raw(
            &[2.0, 0.0, 0.0, 3.0, 0.0, 0.0, 2.0, 1.0, 0.0],
            &[0, 1, 2],
        );

        mesh1.merge(&mesh2);
        assert_eq!(mesh1.vertex_count(), 6);
        assert_eq!(mesh1.face_count(), 2);
        assert_eq!(mesh1.faces[1], [3, 4, 5]);
        assert!(mesh1.validate().is_ok());
    }

    #[test]
    fn tetrahedron_is_valid() {
        let tet = unit_tetrahedron();
        assert!(tet.validate().is_ok());
        assert!((tet.bounds().max.z - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn triangles_iterator_matches_faces() {
        let tet = unit_tetrahedron();
        assert_eq!(tet.triangles().count(), 4);

        let tri = tet.triangle(1).map(|t| t.v2);
        assert_eq!(tri, Some(Point3::new(0.5, 0.5, 1.0)));
        assert!(tet.triangle(10).is_none());
    }
}
