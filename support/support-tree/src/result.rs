//! Result types for support generation.

use support_types::Point3;

use crate::error::{SupportError, SupportResult};

/// What one child slot of a junction connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Link {
    /// Another node of the same tree.
    Node(u32),
    /// The build plate at z = 0.
    Plate,
    /// The model surface.
    Mesh,
}

/// One node of a support tree.
///
/// Leaves sit on sampled overhang points; junctions sit on synthesized
/// merge apexes, plate feet, or mesh contact points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportNode {
    /// Index into [`SupportTree::points`] for this node's position.
    pub point: u32,

    /// The two ends joined at this node, or `None` for a leaf.
    pub children: Option<(Link, Link)>,

    /// Number of leaves this node subtends. Renderers size trunk thickness
    /// from it.
    pub weight: u32,
}

impl SupportNode {
    /// Whether this node is a leaf (a sampled overhang point).
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// A forest of branching support trunks.
///
/// Nodes are appended bottom-up: every `Link::Node(i)` child of node `j`
/// satisfies `i < j`, so walking the node list in order visits children
/// before their parents and the structure can never cycle.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportTree {
    /// Node positions: sampled overhang points first, then synthesized
    /// junction, plate-foot, and mesh-contact points in creation order.
    pub points: Vec<Point3<f64>>,

    /// Nodes in creation order.
    pub nodes: Vec<SupportNode>,
}

impl SupportTree {
    /// Create an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            points: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of leaf nodes.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Position of a node, or `None` if the index is out of range.
    #[must_use]
    pub fn node_point(&self, node: u32) -> Option<Point3<f64>> {
        let point = self.nodes.get(node as usize)?.point;
        self.points.get(point as usize).copied()
    }

    /// Indices of the root nodes: nodes no other node links to.
    ///
    /// In a completed tree every root is a plate or mesh junction, or a
    /// leaf that was discarded against the merge threshold.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn roots(&self) -> Vec<u32> {
        let mut referenced = vec![false; self.nodes.len()];
        for node in &self.nodes {
            if let Some((a, b)) = node.children {
                for link in [a, b] {
                    if let Link::Node(child) = link
                        && let Some(slot) = referenced.get_mut(child as usize)
                    {
                        *slot = true;
                    }
                }
            }
        }
        referenced
            .iter()
            .enumerate()
            .filter(|&(_, seen)| !seen)
            .map(|(i, _)| i as u32)
            .collect()
    }

    /// Check structural invariants: point indices in range, children
    /// strictly preceding their parents, and no node claimed by two parents.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::InvariantViolation`] describing the first
    /// defect found.
    pub fn validate(&self) -> SupportResult<()> {
        let mut claimed = vec![false; self.nodes.len()];

        for (i, node) in self.nodes.iter().enumerate() {
            if node.point as usize >= self.points.len() {
                return Err(SupportError::InvariantViolation(format!(
                    "node {i} references point {} but tree has {} points",
                    node.point,
                    self.points.len()
                )));
            }

            let Some((a, b)) = node.children else {
                continue;
            };
            for link in [a, b] {
                let Link::Node(child) = link else { continue };
                if child as usize >= i {
                    return Err(SupportError::InvariantViolation(format!(
                        "node {i} links to node {child}; children must precede parents"
                    )));
                }
                if claimed[child as usize] {
                    return Err(SupportError::InvariantViolation(format!(
                        "node {child} has two parents"
                    )));
                }
                claimed[child as usize] = true;
            }
        }

        Ok(())
    }
}

/// Counters describing one support-generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportStats {
    /// Faces flagged as overhangs.
    pub faces_flagged: usize,

    /// Degenerate (zero-area) faces skipped during sampling.
    pub degenerate_faces: usize,

    /// Sample points generated before grid thinning.
    pub raw_samples: usize,

    /// Sample points after thinning; each becomes a tree leaf.
    pub leaves: usize,

    /// Junctions merging two support cones.
    pub cone_merges: usize,

    /// Junctions anchoring a trunk to the build plate.
    pub plate_anchors: usize,

    /// Junctions anchoring a trunk to the model surface.
    pub mesh_anchors: usize,

    /// Cones left unconnected because their best candidate cost exceeded
    /// the merge threshold.
    pub discarded: usize,
}

impl SupportStats {
    /// Total junctions created, across all three kinds.
    #[must_use]
    pub const fn junctions(&self) -> usize {
        self.cone_merges + self.plate_anchors + self.mesh_anchors
    }
}

impl std::fmt::Display for SupportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Supports: {} faces flagged, {} leaves ({} raw samples), \
             {} merges, {} plate + {} mesh anchors, {} discarded",
            self.faces_flagged,
            self.leaves,
            self.raw_samples,
            self.cone_merges,
            self.plate_anchors,
            self.mesh_anchors,
            self.discarded
        )
    }
}

/// Everything produced by a support-generation run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportOutput {
    /// The generated support forest.
    pub tree: SupportTree,

    /// Run diagnostics.
    pub stats: SupportStats,
}
