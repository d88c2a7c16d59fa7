//! Canonical per-triangle frames for closest-point queries.
//!
//! Every triangle gets a local coordinate system in which closest-point
//! queries become 2D: local axis `x` is the off-plane direction, and the
//! triangle lies in the `(u, v)` plane (local axes `y` and `z`) in a
//! canonical layout fixed purely by its edge lengths. Corner 0 sits at the
//! origin, corner 1 along `+v`, and corner 2 at positive `u`. The layout,
//! the edge supporting lines, and the perpendicular cap lines at each edge
//! endpoint are computed once per triangle; afterwards a query point is
//! classified into one of seven planar regions (the face, three edge bands,
//! three vertex fans) and its closest point on the triangle read off
//! directly.

use nalgebra::{Matrix3, Point3};
use rayon::prelude::*;
use support_types::{TriMesh, Triangle};

/// Triangles with a normal shorter than this are treated as degenerate.
const DEGENERACY_EPSILON: f64 = 1e-10;

/// A 2D line in implicit form `a·u + b·v + c = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Line2 {
    a: f64,
    b: f64,
    c: f64,
}

impl Line2 {
    /// Line through two points (cross-product construction).
    fn through(p: (f64, f64), q: (f64, f64)) -> Self {
        Self {
            a: p.1 - q.1,
            b: q.0 - p.0,
            c: p.0 * q.1 - q.0 * p.1,
        }
    }

    /// Signed value of the line equation at a point. Zero on the line;
    /// the sign identifies the side.
    fn eval(&self, u: f64, v: f64) -> f64 {
        self.a * u + self.b * v + self.c
    }

    /// The perpendicular line passing through the given point.
    fn perpendicular_at(&self, u: f64, v: f64) -> Self {
        let a = self.b;
        let b = -self.a;
        Self {
            a,
            b,
            c: -(a * u + b * v),
        }
    }

    /// Intersection of two lines, or `None` if they are parallel.
    fn intersect(&self, other: &Self) -> Option<(f64, f64)> {
        let det = self.a * other.b - other.a * self.b;
        if det.abs() < f64::EPSILON {
            return None;
        }
        Some((
            (self.b * other.c - other.b * self.c) / det,
            (other.a * self.c - self.a * other.c) / det,
        ))
    }
}

/// A line together with the side (sign of [`Line2::eval`]) that counts as
/// inside.
#[derive(Debug, Clone, Copy)]
struct SignedLine {
    line: Line2,
    inside: bool,
}

impl SignedLine {
    const NULL: Self = Self {
        line: Line2 {
            a: 0.0,
            b: 0.0,
            c: 0.0,
        },
        inside: false,
    };

    /// Line through `p` and `q`, with the inside sign taken from `witness`.
    fn through(p: (f64, f64), q: (f64, f64), witness: (f64, f64)) -> Self {
        let line = Line2::through(p, q);
        let inside = line.eval(witness.0, witness.1) >= 0.0;
        Self { line, inside }
    }

    fn contains(&self, u: f64, v: f64) -> bool {
        (self.line.eval(u, v) >= 0.0) == self.inside
    }
}

/// Boundary data for one edge of the canonical layout.
#[derive(Debug, Clone, Copy)]
struct EdgeBound {
    /// Supporting line through the edge's endpoints; inside = the side the
    /// opposite corner lies on.
    edge: SignedLine,
    /// Perpendiculars at the two endpoints, each keeping the other endpoint
    /// inside. Together they bound the edge's band of the plane.
    caps: [SignedLine; 2],
}

impl EdgeBound {
    const NULL: Self = Self {
        edge: SignedLine::NULL,
        caps: [SignedLine::NULL; 2],
    };

    fn new(p: (f64, f64), q: (f64, f64), opposite: (f64, f64)) -> Self {
        let edge = SignedLine::through(p, q, opposite);
        let cap_p = edge.line.perpendicular_at(p.0, p.1);
        let cap_q = edge.line.perpendicular_at(q.0, q.1);
        Self {
            edge,
            caps: [
                SignedLine {
                    line: cap_p,
                    inside: cap_p.eval(q.0, q.1) >= 0.0,
                },
                SignedLine {
                    line: cap_q,
                    inside: cap_q.eval(p.0, p.1) >= 0.0,
                },
            ],
        }
    }
}

/// Identifies one edge of a triangle by its corner pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeTag {
    /// Edge from corner 0 to corner 1.
    E01,
    /// Edge from corner 0 to corner 2.
    E02,
    /// Edge from corner 1 to corner 2.
    E12,
}

impl EdgeTag {
    /// All edges, in storage order.
    pub const ALL: [Self; 3] = [Self::E01, Self::E02, Self::E12];

    /// The two corners this edge connects.
    #[must_use]
    pub const fn endpoints(self) -> (VertexTag, VertexTag) {
        match self {
            Self::E01 => (VertexTag::V0, VertexTag::V1),
            Self::E02 => (VertexTag::V0, VertexTag::V2),
            Self::E12 => (VertexTag::V1, VertexTag::V2),
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::E01 => 0,
            Self::E02 => 1,
            Self::E12 => 2,
        }
    }
}

/// Identifies one corner of a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexTag {
    /// Corner 0.
    V0,
    /// Corner 1.
    V1,
    /// Corner 2.
    V2,
}

impl VertexTag {
    const fn index(self) -> usize {
        match self {
            Self::V0 => 0,
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }
}

/// The Voronoi region of the canonical plane a query point falls in.
///
/// Exactly one region applies to any point for a non-degenerate frame:
/// the triangle interior, one of the three edge bands, or one of the three
/// vertex fans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Directly over the triangle interior; closest point is the
    /// perpendicular projection onto the face.
    Face,
    /// In an edge's band; closest point is the perpendicular foot on that
    /// edge.
    Edge(EdgeTag),
    /// In a vertex's fan; closest point is that corner.
    Vertex(VertexTag),
}

/// Canonical frame of one triangle: an isometric world-to-local map plus
/// the precomputed 2D boundary lines of the canonical layout.
///
/// # Example
///
/// ```
/// use support_tree::{Region, TriangleFrame};
/// use support_types::{Point3, Triangle};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(3.0, 0.0, 0.0),
///     Point3::new(0.0, 4.0, 0.0),
/// );
/// let frame = TriangleFrame::from_triangle(&tri);
///
/// // A point 2 above the interior projects straight down onto the face.
/// let local = frame.to_local(&Point3::new(0.5, 0.5, 2.0));
/// let (closest, region) = frame.closest_point(&local).unwrap();
/// assert_eq!(region, Region::Face);
/// assert!(((local - closest).norm() - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct TriangleFrame {
    /// Canonical corner positions, all with local x = 0.
    corners: [Point3<f64>; 3],
    /// World corner 0; the local origin maps here.
    origin: Point3<f64>,
    /// Rotation part of the world-to-local map.
    linear: Matrix3<f64>,
    /// Rotation part of the local-to-world map (transpose of `linear`).
    inv_linear: Matrix3<f64>,
    /// Boundary data per edge, indexed by [`EdgeTag`].
    edges: [EdgeBound; 3],
    degenerate: bool,
}

impl TriangleFrame {
    /// Build the frame for a triangle.
    ///
    /// Degenerate triangles (zero-length normal or collinear corners)
    /// yield a flagged frame whose queries all return `None`.
    #[must_use]
    pub fn from_triangle(tri: &Triangle) -> Self {
        let e01 = tri.v1 - tri.v0;
        let e02 = tri.v2 - tri.v0;
        let normal = e01.cross(&e02);
        if normal.norm() < DEGENERACY_EPSILON {
            return Self::degenerate();
        }

        let [d01, d02, d12] = tri.edge_lengths();
        if d01 < DEGENERACY_EPSILON {
            return Self::degenerate();
        }

        // Law of cosines fixes the canonical layout from the edge lengths:
        // corner 1 at (u, v) = (0, d01), corner 2 at positive u.
        let v2 = (d02 * d02 - d12 * d12 + d01 * d01) / (2.0 * d01);
        let radicand = d02 * d02 - v2 * v2;
        if radicand <= 0.0 {
            return Self::degenerate();
        }
        let u2 = radicand.sqrt();

        let corners = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, d01),
            Point3::new(0.0, u2, v2),
        ];

        // Orthonormal world basis: off-plane, in-plane across the base
        // edge, along the base edge. Its rows make the map an isometry.
        let x_axis = normal.normalize();
        let z_axis = e01 / d01;
        let y_axis = x_axis.cross(&z_axis);
        let linear = Matrix3::new(
            x_axis.x, x_axis.y, x_axis.z, //
            y_axis.x, y_axis.y, y_axis.z, //
            z_axis.x, z_axis.y, z_axis.z,
        );

        let c0 = (0.0, 0.0);
        let c1 = (0.0, d01);
        let c2 = (u2, v2);
        let edges = [
            EdgeBound::new(c0, c1, c2),
            EdgeBound::new(c0, c2, c1),
            EdgeBound::new(c1, c2, c0),
        ];

        Self {
            corners,
            origin: tri.v0,
            linear,
            inv_linear: linear.transpose(),
            edges,
            degenerate: false,
        }
    }

    /// A flagged frame standing in for an unusable triangle.
    #[must_use]
    pub fn degenerate() -> Self {
        Self {
            corners: [Point3::origin(); 3],
            origin: Point3::origin(),
            linear: Matrix3::zeros(),
            inv_linear: Matrix3::zeros(),
            edges: [EdgeBound::NULL; 3],
            degenerate: true,
        }
    }

    /// Whether this frame stands in for a degenerate triangle.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// The canonical position of a corner (local x = 0).
    #[must_use]
    pub const fn corner(&self, vertex: VertexTag) -> Point3<f64> {
        self.corners[vertex.index()]
    }

    /// Map a world-space point into the local frame.
    #[must_use]
    pub fn to_local(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.linear * (point - self.origin))
    }

    /// Map a local-frame point back to world space.
    #[must_use]
    pub fn to_world(&self, point: &Point3<f64>) -> Point3<f64> {
        self.origin + self.inv_linear * point.coords
    }

    /// Classify a point of the canonical plane into its Voronoi region.
    ///
    /// Returns `None` for degenerate frames, and for query points whose
    /// side tests are inconsistent (possible only when the frame itself is
    /// numerically broken).
    #[must_use]
    pub fn classify(&self, u: f64, v: f64) -> Option<Region> {
        if self.degenerate {
            return None;
        }

        let pass = [
            self.edges[0].edge.contains(u, v),
            self.edges[1].edge.contains(u, v),
            self.edges[2].edge.contains(u, v),
        ];

        match pass {
            [true, true, true] => Some(Region::Face),
            [false, true, true] => Some(self.refine(EdgeTag::E01, u, v)),
            [true, false, true] => Some(self.refine(EdgeTag::E02, u, v)),
            [true, true, false] => Some(self.refine(EdgeTag::E12, u, v)),
            // Two edge tests failing puts the point in the fan of the
            // corner those edges share.
            [false, false, true] => Some(Region::Vertex(VertexTag::V0)),
            [false, true, false] => Some(Region::Vertex(VertexTag::V1)),
            [true, false, false] => Some(Region::Vertex(VertexTag::V2)),
            // Outside all three edges of a triangle is geometrically
            // impossible.
            [false, false, false] => None,
        }
    }

    /// Resolve a point beyond one edge into the edge band or one of the
    /// adjacent vertex fans, using the edge's cap lines.
    fn refine(&self, tag: EdgeTag, u: f64, v: f64) -> Region {
        let bound = &self.edges[tag.index()];
        let (start, end) = tag.endpoints();
        if !bound.caps[0].contains(u, v) {
            return Region::Vertex(start);
        }
        if !bound.caps[1].contains(u, v) {
            return Region::Vertex(end);
        }
        Region::Edge(tag)
    }

    /// Closest point on the triangle to a local-frame query point,
    /// together with the region that produced it. Both are in local
    /// coordinates; the distance is `(local - closest).norm()`.
    ///
    /// Returns `None` for degenerate frames.
    #[must_use]
    pub fn closest_point(&self, local: &Point3<f64>) -> Option<(Point3<f64>, Region)> {
        let region = self.classify(local.y, local.z)?;
        let closest = match region {
            Region::Face => Point3::new(0.0, local.y, local.z),
            Region::Edge(tag) => {
                let line = &self.edges[tag.index()].edge.line;
                let (fu, fv) = line.intersect(&line.perpendicular_at(local.y, local.z))?;
                Point3::new(0.0, fu, fv)
            }
            Region::Vertex(tag) => self.corners[tag.index()],
        };
        Some((closest, region))
    }
}

/// Build one frame per face of a mesh, in face order.
///
/// Runs in parallel across faces. Unusable faces (out-of-range indices or
/// degenerate geometry) yield flagged frames rather than failing the whole
/// pass.
#[must_use]
pub fn build_frames(mesh: &TriMesh) -> Vec<TriangleFrame> {
    (0..mesh.face_count())
        .into_par_iter()
        .map(|i| {
            mesh.triangle(i)
                .map_or_else(TriangleFrame::degenerate, |tri| {
                    TriangleFrame::from_triangle(&tri)
                })
        })
        .collect()
}
