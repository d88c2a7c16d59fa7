//! Grid cell coordinate type.

use nalgebra::Point3;

/// A discrete 3D coordinate in grid space.
///
/// Uses `i32` coordinates so the grid covers world space in every direction
/// from the origin, including negative coordinates.
///
/// # Example
///
/// ```
/// use support_spatial::CellKey;
///
/// let key = CellKey::new(1, -2, 3);
/// assert_eq!(key.as_tuple(), (1, -2, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellKey {
    /// X coordinate (width axis).
    pub x: i32,
    /// Y coordinate (depth axis).
    pub y: i32,
    /// Z coordinate (height axis).
    pub z: i32,
}

impl CellKey {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cell containing a world-space point, for a given cell size.
    ///
    /// Points exactly on a cell boundary belong to the higher cell
    /// (floor semantics).
    ///
    /// # Example
    ///
    /// ```
    /// use nalgebra::Point3;
    /// use support_spatial::CellKey;
    ///
    /// let key = CellKey::containing(&Point3::new(2.5, -0.1, 0.0), 1.0);
    /// assert_eq!(key, CellKey::new(2, -1, 0));
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation is intentional: continuous coordinates map to discrete cells
    pub fn containing(point: &Point3<f64>, cell_size: f64) -> Self {
        let inv = 1.0 / cell_size;
        Self::new(
            (point.x * inv).floor() as i32,
            (point.y * inv).floor() as i32,
            (point.z * inv).floor() as i32,
        )
    }

    /// Returns the coordinate as a tuple.
    #[must_use]
    pub const fn as_tuple(self) -> (i32, i32, i32) {
        (self.x, self.y, self.z)
    }
}
