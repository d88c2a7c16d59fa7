//! Greedy bottom-up construction of the support forest.
//!
//! Leaves are the sampled overhang points. The builder repeatedly takes the
//! tallest unconnected cone and joins it to the cheapest of three candidate
//! families: a merge with another unconnected cone, a drop to the build
//! plate, or a rest on the model surface. Cone merges feed a new, lower
//! cone back into the pool; plate and mesh joints finish a trunk.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use support_types::Point3;
use tracing::debug;

use crate::cone::{Cone, ConeMeet, MeshContact, cone_cone_meet, cone_mesh_meet};
use crate::frame::TriangleFrame;
use crate::params::SupportParams;
use crate::result::{Link, SupportNode, SupportStats, SupportTree};

/// An unconnected cone, ordered by apex height with the node index as the
/// tie-breaker so iteration order is deterministic.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveCone {
    z: f64,
    node: u32,
}

impl Eq for ActiveCone {}

impl Ord for ActiveCone {
    fn cmp(&self, other: &Self) -> Ordering {
        self.z
            .partial_cmp(&other.z)
            .unwrap_or(Ordering::Equal)
            .then(self.node.cmp(&other.node))
    }
}

impl PartialOrd for ActiveCone {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The cheapest join found for the cone being connected.
enum Candidate {
    Merge(ActiveCone, ConeMeet),
    Plate,
    Mesh(MeshContact),
}

/// Build the support forest over the sampled points.
///
/// Points are sorted by height (stable, so equal heights keep their input
/// order) and become the leaf nodes. Candidates are examined in a fixed
/// order per step: merges with the remaining unconnected cones in
/// ascending (height, node) order, then the plate, then the mesh; the
/// first strict minimum wins, so runs are deterministic. A point whose
/// best candidate costs more than `merge_threshold` is left as an
/// unconnected leaf and counted in `discarded`.
///
/// The returned stats cover the build only; the sampling counters are
/// zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn build_tree(
    samples: Vec<Point3<f64>>,
    frames: &[TriangleFrame],
    params: &SupportParams,
) -> (SupportTree, SupportStats) {
    let mut stats = SupportStats::default();

    let mut points = samples;
    points.sort_by(|a, b| a.z.partial_cmp(&b.z).unwrap_or(Ordering::Equal));

    let mut nodes: Vec<SupportNode> = Vec::with_capacity(points.len());
    let mut cones: Vec<Cone> = Vec::with_capacity(points.len());
    let mut active: BTreeSet<ActiveCone> = BTreeSet::new();

    for (i, point) in points.iter().enumerate() {
        let node = i as u32;
        nodes.push(SupportNode {
            point: node,
            children: None,
            weight: 1,
        });
        cones.push(Cone::new(*point, params.cone_half_angle));
        active.insert(ActiveCone { z: point.z, node });
    }
    stats.leaves = nodes.len();

    while let Some(current) = active.pop_last() {
        let cone = cones[current.node as usize];

        let mut best_cost = f64::INFINITY;
        let mut best: Option<Candidate> = None;

        for &entry in &active {
            if let Some(meet) = cone_cone_meet(&cone, &cones[entry.node as usize])
                && meet.cost < best_cost
            {
                best_cost = meet.cost;
                best = Some(Candidate::Merge(entry, meet));
            }
        }

        // Dropping to the plate costs the full remaining height.
        if cone.apex.z < best_cost {
            best_cost = cone.apex.z;
            best = Some(Candidate::Plate);
        }

        if let Some(contact) = cone_mesh_meet(&cone, frames)
            && contact.cost < best_cost
        {
            best_cost = contact.cost;
            best = Some(Candidate::Mesh(contact));
        }

        let Some(candidate) = best else {
            stats.discarded += 1;
            continue;
        };
        if best_cost > params.merge_threshold {
            debug!(
                node = current.node,
                cost = best_cost,
                "cheapest candidate over threshold, leaf discarded"
            );
            stats.discarded += 1;
            continue;
        }

        match candidate {
            Candidate::Merge(partner, meet) => {
                active.remove(&partner);
                let weight =
                    nodes[current.node as usize].weight + nodes[partner.node as usize].weight;
                let node = push_junction(
                    &mut points,
                    &mut nodes,
                    &mut cones,
                    params.cone_half_angle,
                    meet.apex,
                    (Link::Node(current.node), Link::Node(partner.node)),
                    weight,
                );
                active.insert(ActiveCone {
                    z: meet.apex.z,
                    node,
                });
                stats.cone_merges += 1;
            }
            Candidate::Plate => {
                let foot = Point3::new(cone.apex.x, cone.apex.y, 0.0);
                let weight = nodes[current.node as usize].weight;
                push_junction(
                    &mut points,
                    &mut nodes,
                    &mut cones,
                    params.cone_half_angle,
                    foot,
                    (Link::Plate, Link::Node(current.node)),
                    weight,
                );
                stats.plate_anchors += 1;
            }
            Candidate::Mesh(contact) => {
                let weight = nodes[current.node as usize].weight;
                push_junction(
                    &mut points,
                    &mut nodes,
                    &mut cones,
                    params.cone_half_angle,
                    contact.point,
                    (Link::Mesh, Link::Node(current.node)),
                    weight,
                );
                stats.mesh_anchors += 1;
            }
        }
    }

    (SupportTree { points, nodes }, stats)
}

/// Append a junction node with its position and cone, keeping the three
/// arrays in lockstep so node indices address all of them.
#[allow(clippy::cast_possible_truncation)]
fn push_junction(
    points: &mut Vec<Point3<f64>>,
    nodes: &mut Vec<SupportNode>,
    cones: &mut Vec<Cone>,
    half_angle: f64,
    position: Point3<f64>,
    children: (Link, Link),
    weight: u32,
) -> u32 {
    let index = nodes.len() as u32;
    points.push(position);
    nodes.push(SupportNode {
        point: index,
        children: Some(children),
        weight,
    });
    cones.push(Cone::new(position, half_angle));
    index
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use support_types::TriMesh;

    use crate::frame::build_frames;

    use super::*;

    #[test]
    fn empty_input_builds_empty_tree() {
        let (tree, stats) = build_tree(Vec::new(), &[], &SupportParams::default());
        assert!(tree.is_empty());
        assert_eq!(stats.leaves, 0);
        assert_eq!(stats.junctions(), 0);
    }

    #[test]
    fn isolated_point_drops_to_the_plate() {
        let samples = vec![Point3::new(1.0, 2.0, 5.0)];
        let (tree, stats) = build_tree(samples, &[], &SupportParams::default());

        assert_eq!(tree.node_count(), 2);
        assert_eq!(stats.leaves, 1);
        assert_eq!(stats.plate_anchors, 1);

        let junction = tree.nodes[1];
        assert_eq!(junction.children, Some((Link::Plate, Link::Node(0))));
        assert_eq!(junction.weight, 1);
        assert_relative_eq!(tree.points[1], Point3::new(1.0, 2.0, 0.0));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn pair_merges_then_grounds() {
        let samples = vec![Point3::new(0.0, 0.0, 4.0), Point3::new(2.0, 0.0, 4.0)];
        let (tree, stats) = build_tree(samples, &[], &SupportParams::default());

        assert_eq!(stats.cone_merges, 1);
        assert_eq!(stats.plate_anchors, 1);
        assert_eq!(tree.node_count(), 4);

        // The merge joint sits midway between the apexes, one unit down.
        assert_relative_eq!(tree.points[2], Point3::new(1.0, 0.0, 3.0));
        assert_relative_eq!(tree.points[3], Point3::new(1.0, 0.0, 0.0));

        assert_eq!(tree.nodes[2].weight, 2);
        assert_eq!(tree.roots(), vec![3]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn nearby_surface_beats_the_plate() {
        // A floor patch at z = 2 under a point at z = 5: resting on the
        // patch costs 3 against 5 for the plate.
        let mesh = TriMesh::from_raw(
            &[0.0, 0.0, 2.0, 4.0, 0.0, 2.0, 0.0, 4.0, 2.0],
            &[0, 1, 2],
        );
        let frames = build_frames(&mesh);

        let samples = vec![Point3::new(1.0, 1.0, 5.0)];
        let (tree, stats) = build_tree(samples, &frames, &SupportParams::default());

        assert_eq!(stats.mesh_anchors, 1);
        assert_eq!(stats.plate_anchors, 0);
        assert_eq!(tree.nodes[1].children, Some((Link::Mesh, Link::Node(0))));
        assert_relative_eq!(tree.points[1], Point3::new(1.0, 1.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn threshold_leaves_expensive_points_unconnected() {
        let samples = vec![Point3::new(0.0, 0.0, 5.0)];
        let params = SupportParams::default().with_merge_threshold(2.0);
        let (tree, stats) = build_tree(samples, &[], &params);

        assert_eq!(stats.discarded, 1);
        assert_eq!(stats.junctions(), 0);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.roots(), vec![0]);
    }

    #[test]
    fn merge_wins_cost_ties_against_the_plate() {
        // Merge cost and plate cost are both exactly 1; the merge family
        // is scanned first and keeps the tie.
        let samples = vec![Point3::new(0.0, 0.0, 1.0), Point3::new(2.0, 0.0, 1.0)];
        let (tree, stats) = build_tree(samples, &[], &SupportParams::default());

        assert_eq!(stats.cone_merges, 1);
        assert_eq!(stats.plate_anchors, 1);
        assert_relative_eq!(tree.points[2], Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn distant_points_ground_separately() {
        let samples = vec![Point3::new(0.0, 0.0, 3.0), Point3::new(50.0, 0.0, 3.0)];
        let (tree, stats) = build_tree(samples, &[], &SupportParams::default());

        assert_eq!(stats.cone_merges, 0);
        assert_eq!(stats.plate_anchors, 2);
        assert_eq!(tree.roots(), vec![2, 3]);
    }

    #[test]
    fn stacked_points_cannot_merge() {
        let samples = vec![Point3::new(1.0, 1.0, 2.0), Point3::new(1.0, 1.0, 4.0)];
        let (tree, stats) = build_tree(samples, &[], &SupportParams::default());

        assert_eq!(stats.cone_merges, 0);
        assert_eq!(stats.plate_anchors, 2);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn cluster_merges_into_one_trunk() {
        let samples = vec![
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(1.0, 0.0, 2.0),
            Point3::new(0.0, 1.0, 2.0),
            Point3::new(1.0, 1.0, 2.0),
        ];
        let (tree, stats) = build_tree(samples, &[], &SupportParams::default());

        assert_eq!(stats.leaves, 4);
        assert_eq!(stats.cone_merges, 3);
        assert_eq!(stats.plate_anchors, 1);
        assert_eq!(tree.node_count(), 8);

        // One trunk carries all four leaves to the plate.
        let roots = tree.roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(tree.nodes[roots[0] as usize].weight, 4);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn leaves_are_sorted_by_height() {
        let samples = vec![
            Point3::new(0.0, 0.0, 9.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(2.0, 0.0, 5.0),
        ];
        let params = SupportParams::default().with_merge_threshold(0.0);
        let (tree, stats) = build_tree(samples, &[], &params);

        // Threshold zero discards everything, leaving just the leaves.
        assert_eq!(stats.discarded, 3);
        assert_relative_eq!(tree.points[0].z, 1.0);
        assert_relative_eq!(tree.points[1].z, 5.0);
        assert_relative_eq!(tree.points[2].z, 9.0);
    }
}
