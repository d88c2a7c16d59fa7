//! Result types for plane clipping.

/// Counters describing one clipping run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClipStats {
    /// Faces kept unchanged (no vertex strictly below the plane).
    pub kept: usize,

    /// Faces dropped (no vertex strictly above the plane).
    pub dropped: usize,

    /// Faces with two vertices above and one below, re-triangulated into
    /// three triangles around the midpoint of the surviving edge.
    pub split_two_above: usize,

    /// Faces with one vertex above, cut down to a single corner triangle.
    pub split_one_above: usize,

    /// Intersection and midpoint vertices appended to the mesh.
    pub vertices_added: usize,
}

impl ClipStats {
    /// Total faces the cutting plane crossed.
    #[must_use]
    pub const fn split(&self) -> usize {
        self.split_two_above + self.split_one_above
    }

    /// Whether the run changed the mesh at all.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.dropped == 0 && self.split() == 0
    }
}

impl std::fmt::Display for ClipStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Clip: {} kept, {} dropped, {} split ({} vertices added)",
            self.kept,
            self.dropped,
            self.split(),
            self.vertices_added
        )
    }
}
