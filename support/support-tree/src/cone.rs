//! Support cone geometry: where cones meet each other and the model.
//!
//! A support cone opens downward from the point it supports; a strut may
//! descend along any direction within the cone's half-angle. Two points can
//! share a trunk below the meeting point of their cones, and a trunk can
//! terminate early where its cone touches the model surface.

use rayon::prelude::*;
use support_types::Point3;

use crate::frame::TriangleFrame;

/// Mesh contacts closer to the apex than this are ignored. The apex itself
/// lies on the surface it was sampled from, at distance zero.
const CONTACT_EPSILON: f64 = 1e-9;

/// A support cone: the set of points from which a straight strut can reach
/// the apex while staying within the printable lean angle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cone {
    /// The supported point; the cone opens downward from here.
    pub apex: Point3<f64>,

    /// Half-angle in radians. Every cone in a run shares the value from
    /// [`SupportParams::cone_half_angle`](crate::SupportParams::cone_half_angle).
    pub half_angle: f64,
}

impl Cone {
    /// Create a cone.
    #[must_use]
    pub const fn new(apex: Point3<f64>, half_angle: f64) -> Self {
        Self { apex, half_angle }
    }
}

/// The point where two cones can join into one strut.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConeMeet {
    /// The joint, which becomes the apex of the merged cone.
    pub apex: Point3<f64>,

    /// Vertical drop from the higher of the two apexes down to the joint.
    pub cost: f64,
}

/// A point where a cone can rest on the model surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshContact {
    /// World-space contact point on the surface.
    pub point: Point3<f64>,

    /// Distance from the apex to the contact.
    pub cost: f64,
}

/// The highest point lying in both cones, or `None` when no such point
/// exists below both apexes.
///
/// Coincident apexes meet at themselves with cost zero. Apexes stacked on
/// the same vertical line, and pairs whose horizontal separation is smaller
/// than the height difference demands (`d_xy < |d_z|·tan θ`, the lower apex
/// already inside the upper cone), have no two-sided joint and yield `None`.
///
/// The cost is the vertical drop from the higher apex to the joint, which
/// makes it symmetric: `cone_cone_meet(a, b)` and `cone_cone_meet(b, a)`
/// report identical cost for cones sharing a half-angle.
#[must_use]
pub fn cone_cone_meet(a: &Cone, b: &Cone) -> Option<ConeMeet> {
    let d_z = b.apex.z - a.apex.z;
    let dx = a.apex.x - b.apex.x;
    let dy = a.apex.y - b.apex.y;
    let d_xy = (dx * dx + dy * dy).sqrt();

    if d_xy < f64::EPSILON {
        if d_z.abs() < f64::EPSILON {
            return Some(ConeMeet {
                apex: a.apex,
                cost: 0.0,
            });
        }
        return None;
    }

    let slope = a.half_angle.tan();
    if d_xy < d_z.abs() * slope {
        return None;
    }

    // Drops below each apex to the joint; their sum spans the horizontal
    // separation at the cone slope.
    let drop_a = (d_xy / slope - d_z) / 2.0;
    let drop_b = drop_a + d_z;
    let denom = drop_a + drop_b; // = d_xy / slope, positive here

    Some(ConeMeet {
        apex: Point3::new(
            (drop_b * a.apex.x + drop_a * b.apex.x) / denom,
            (drop_b * a.apex.y + drop_a * b.apex.y) / denom,
            a.apex.z - drop_a,
        ),
        cost: (d_xy / slope + d_z.abs()) / 2.0,
    })
}

/// The closest admissible point where the cone touches the model surface,
/// or `None` if no triangle offers one.
///
/// A contact is admissible when it lies inside the downward cone: drop
/// `h = apex.z − contact.z ≥ 0` and `tan θ·h` at least the horizontal
/// distance. Contacts at the apex itself are skipped. Among admissible
/// triangles the smallest apex-to-contact distance wins, with ties going
/// to the lowest face index, so the scan is deterministic.
#[must_use]
pub fn cone_mesh_meet(cone: &Cone, frames: &[TriangleFrame]) -> Option<MeshContact> {
    let slope = cone.half_angle.tan();
    let apex = cone.apex;

    frames
        .par_iter()
        .enumerate()
        .filter_map(|(face, frame)| {
            let local = frame.to_local(&apex);
            let (closest, _) = frame.closest_point(&local)?;

            let cost = (local - closest).norm();
            if cost < CONTACT_EPSILON {
                return None;
            }

            let contact = frame.to_world(&closest);
            let drop = apex.z - contact.z;
            if drop < 0.0 {
                return None;
            }
            let dx = apex.x - contact.x;
            let dy = apex.y - contact.y;
            if slope * drop < (dx * dx + dy * dy).sqrt() {
                return None;
            }

            Some((cost, face, contact))
        })
        .min_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        })
        .map(|(cost, _, point)| MeshContact { point, cost })
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_4;

    use approx::assert_relative_eq;
    use support_types::{TriMesh, Triangle};

    use crate::frame::build_frames;

    use super::*;

    #[test]
    fn same_height_meet_halves_the_separation() {
        // Two apexes 2 apart at the same height, 45 degree cones: the
        // joint sits at the midpoint, one unit down, at cost 1.
        let a = Cone::new(Point3::new(0.0, 0.0, 5.0), FRAC_PI_4);
        let b = Cone::new(Point3::new(2.0, 0.0, 5.0), FRAC_PI_4);

        let meet = cone_cone_meet(&a, &b).unwrap();
        assert_relative_eq!(meet.apex, Point3::new(1.0, 0.0, 4.0), epsilon = 1e-12);
        assert_relative_eq!(meet.cost, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cost_is_exactly_symmetric() {
        let a = Cone::new(Point3::new(0.3, -1.7, 6.2), FRAC_PI_4);
        let b = Cone::new(Point3::new(2.9, 4.1, 5.0), FRAC_PI_4);

        let ab = cone_cone_meet(&a, &b).unwrap();
        let ba = cone_cone_meet(&b, &a).unwrap();

        // Bitwise equal, not merely approximately.
        assert_eq!(ab.cost, ba.cost);
        assert_relative_eq!(ab.apex, ba.apex, epsilon = 1e-12);
    }

    #[test]
    fn unequal_heights_drop_from_the_higher_apex() {
        let a = Cone::new(Point3::new(0.0, 0.0, 4.0), FRAC_PI_4);
        let b = Cone::new(Point3::new(3.0, 0.0, 3.0), FRAC_PI_4);

        let meet = cone_cone_meet(&a, &b).unwrap();
        assert_relative_eq!(meet.apex, Point3::new(2.0, 0.0, 2.0), epsilon = 1e-12);
        // Drop from a (the higher apex) to the joint.
        assert_relative_eq!(meet.cost, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn coincident_apexes_meet_at_no_cost() {
        let a = Cone::new(Point3::new(1.0, 2.0, 3.0), FRAC_PI_4);
        let meet = cone_cone_meet(&a, &a).unwrap();
        assert_eq!(meet.cost, 0.0);
        assert_eq!(meet.apex, a.apex);
    }

    #[test]
    fn stacked_apexes_never_meet() {
        let a = Cone::new(Point3::new(1.0, 1.0, 5.0), FRAC_PI_4);
        let b = Cone::new(Point3::new(1.0, 1.0, 2.0), FRAC_PI_4);
        assert!(cone_cone_meet(&a, &b).is_none());
        assert!(cone_cone_meet(&b, &a).is_none());
    }

    #[test]
    fn apex_inside_the_other_cone_never_meets() {
        // Nearly stacked: the lower apex sits inside the upper cone, so
        // no joint lies below both apexes.
        let a = Cone::new(Point3::new(0.0, 0.0, 10.0), FRAC_PI_4);
        let b = Cone::new(Point3::new(1.0, 0.0, 1.0), FRAC_PI_4);
        assert!(cone_cone_meet(&a, &b).is_none());
        assert!(cone_cone_meet(&b, &a).is_none());
    }

    /// A single right triangle with legs of length 4, flat on z = 0.
    fn floor_patch() -> Vec<TriangleFrame> {
        let mesh = TriMesh::from_raw(
            &[0.0, 0.0, 0.0, 4.0, 0.0, 0.0, 0.0, 4.0, 0.0],
            &[0, 1, 2],
        );
        build_frames(&mesh)
    }

    #[test]
    fn contact_straight_below_the_apex() {
        let frames = floor_patch();
        let cone = Cone::new(Point3::new(1.0, 1.0, 3.0), FRAC_PI_4);

        let contact = cone_mesh_meet(&cone, &frames).unwrap();
        assert_relative_eq!(contact.point, Point3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(contact.cost, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn contact_outside_the_cone_is_rejected() {
        let frames = floor_patch();
        // Closest surface point is the corner (4, 0, 0), sideways distance
        // 6 against a drop of 1: far outside a 45 degree cone.
        let cone = Cone::new(Point3::new(10.0, 0.0, 1.0), FRAC_PI_4);
        assert!(cone_mesh_meet(&cone, &frames).is_none());
    }

    #[test]
    fn contact_above_the_apex_is_rejected() {
        let frames = floor_patch();
        let cone = Cone::new(Point3::new(1.0, 1.0, -2.0), FRAC_PI_4);
        assert!(cone_mesh_meet(&cone, &frames).is_none());
    }

    #[test]
    fn own_surface_point_is_not_a_contact() {
        let frames = floor_patch();
        // Apex exactly on the triangle: the zero-length contact must not
        // count, and no other surface exists.
        let cone = Cone::new(Point3::new(1.0, 1.0, 0.0), FRAC_PI_4);
        assert!(cone_mesh_meet(&cone, &frames).is_none());
    }

    #[test]
    fn nearest_of_several_faces_wins() {
        // Two parallel floor patches at z = 0 and z = 2.
        let mut mesh = TriMesh::from_raw(
            &[0.0, 0.0, 0.0, 4.0, 0.0, 0.0, 0.0, 4.0, 0.0],
            &[0, 1, 2],
        );
        mesh.merge(&TriMesh::from_raw(
            &[0.0, 0.0, 2.0, 4.0, 0.0, 2.0, 0.0, 4.0, 2.0],
            &[0, 1, 2],
        ));
        let frames = build_frames(&mesh);

        let cone = Cone::new(Point3::new(1.0, 1.0, 5.0), FRAC_PI_4);
        let contact = cone_mesh_meet(&cone, &frames).unwrap();
        assert_relative_eq!(contact.point, Point3::new(1.0, 1.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(contact.cost, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_faces_are_skipped() {
        let mesh = TriMesh::from_raw(
            &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0],
            &[0, 1, 2],
        );
        let frames = build_frames(&mesh);
        assert!(frames[0].is_degenerate());

        let cone = Cone::new(Point3::new(1.0, 1.0, 5.0), FRAC_PI_4);
        assert!(cone_mesh_meet(&cone, &frames).is_none());
    }

    #[test]
    fn edge_region_contact_uses_the_perpendicular_foot() {
        // Triangle edge from (0,0,0) to (4,0,0); apex out at y = -3 above.
        let triangle = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        );
        let frames = vec![TriangleFrame::from_triangle(&triangle)];

        let cone = Cone::new(Point3::new(2.0, -3.0, 5.0), FRAC_PI_4);
        let contact = cone_mesh_meet(&cone, &frames).unwrap();

        assert_relative_eq!(contact.point, Point3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
        // Distance from the apex: sqrt(3^2 + 5^2).
        assert_relative_eq!(contact.cost, 34.0_f64.sqrt(), epsilon = 1e-12);
    }
}
