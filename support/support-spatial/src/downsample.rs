//! Grid-based point cloud thinning.

use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

use crate::cell::CellKey;

/// Thins a point cloud by snapping points into a uniform grid and
/// replacing each occupied cell with the centroid of its points.
///
/// Output order follows the first appearance of each cell in the input,
/// so the same input always yields the same output. The cell size is
/// clamped to a small positive value to avoid division by zero.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use support_spatial::downsample_points;
///
/// let points = vec![
///     Point3::new(0.1, 0.1, 0.0),
///     Point3::new(0.2, 0.2, 0.0),
///     Point3::new(5.0, 5.0, 0.0),
/// ];
/// let thinned = downsample_points(&points, 1.0);
/// assert_eq!(thinned.len(), 2);
/// ```
#[must_use]
pub fn downsample_points(points: &[Point3<f64>], cell_size: f64) -> Vec<Point3<f64>> {
    let cell_size = cell_size.abs().max(f64::EPSILON);

    let mut cells: HashMap<CellKey, (Vector3<f64>, usize)> = HashMap::new();
    let mut order: Vec<CellKey> = Vec::new();

    for point in points {
        let key = CellKey::containing(point, cell_size);
        let entry = cells.entry(key).or_insert_with(|| {
            order.push(key);
            (Vector3::zeros(), 0)
        });
        entry.0 += point.coords;
        entry.1 += 1;
    }

    order
        .into_iter()
        .map(|key| {
            let (sum, count) = cells[&key];
            #[allow(clippy::cast_precision_loss)]
            Point3::from(sum / count as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(downsample_points(&[], 1.0).is_empty());
    }

    #[test]
    fn single_point_survives_unchanged() {
        let points = vec![Point3::new(0.25, 0.5, 0.75)];
        let thinned = downsample_points(&points, 1.0);
        assert_eq!(thinned.len(), 1);
        assert_relative_eq!(thinned[0], points[0]);
    }

    #[test]
    fn points_in_one_cell_collapse_to_centroid() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.5, 0.5, 0.0),
            Point3::new(0.25, 0.25, 0.5),
        ];
        let thinned = downsample_points(&points, 1.0);
        assert_eq!(thinned.len(), 1);
        assert_relative_eq!(thinned[0], Point3::new(0.25, 0.25, 1.0 / 6.0));
    }

    #[test]
    fn distant_points_stay_separate() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(0.0, 10.0, 0.0),
        ];
        let thinned = downsample_points(&points, 1.0);
        assert_eq!(thinned.len(), 3);
    }

    #[test]
    fn output_order_follows_first_appearance() {
        let points = vec![
            Point3::new(10.5, 0.0, 0.0),
            Point3::new(0.5, 0.0, 0.0),
            Point3::new(10.4, 0.0, 0.0),
            Point3::new(0.4, 0.0, 0.0),
        ];
        let thinned = downsample_points(&points, 1.0);
        assert_eq!(thinned.len(), 2);
        // First cell seen is the one near x = 10.
        assert!(thinned[0].x > 5.0);
        assert!(thinned[1].x < 5.0);
    }

    #[test]
    fn repeat_runs_are_identical() {
        let points: Vec<Point3<f64>> = (0..100)
            .map(|i| {
                let t = f64::from(i) * 0.37;
                Point3::new(t.sin() * 8.0, t.cos() * 8.0, t * 0.1)
            })
            .collect();
        let first = downsample_points(&points, 2.0);
        let second = downsample_points(&points, 2.0);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn zero_cell_size_does_not_panic() {
        let points = vec![Point3::new(1.0, 2.0, 3.0)];
        let thinned = downsample_points(&points, 0.0);
        assert_eq!(thinned.len(), 1);
    }

    #[test]
    fn negative_cell_size_behaves_like_positive() {
        let points = vec![Point3::new(0.1, 0.1, 0.0), Point3::new(0.2, 0.2, 0.0)];
        let a = downsample_points(&points, 1.0);
        let b = downsample_points(&points, -1.0);
        assert_eq!(a, b);
    }
}
