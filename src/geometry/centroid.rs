/// Area-weighted centroid of a closed ring
///
/// # Algorithm
/// Shoelace formula: for every edge (p_j, p_i), including the wrap-around
/// edge from the last vertex back to the first, accumulate
/// `f = x_j * y_i - x_i * y_j`, `(x_j + x_i) * f` and `(y_j + y_i) * f`.
/// The centroid is the weighted sum divided by 6 * signed area.
///
/// A ring whose signed area is exactly zero (collinear or repeated points)
/// has no defined centroid; its first vertex is returned instead.
///
/// # Returns
/// * `None` only for an empty ring
pub fn polygon_centroid(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let first = *points.first()?;

    let mut x = 0.0;
    let mut y = 0.0;
    let mut area = 0.0;

    let previous = points.iter().cycle().skip(points.len() - 1);
    for (&(x0, y0), &(x1, y1)) in previous.zip(points) {
        let f = x0 * y1 - x1 * y0;
        x += (x0 + x1) * f;
        y += (y0 + y1) * f;
        area += f;
    }

    area /= 2.0;
    if area == 0.0 {
        return Some(first);
    }

    Some((x / (6.0 * area), y / (6.0 * area)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Centroid, LineString, Polygon};

    #[test]
    fn test_square_centroid() {
        let square = vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)];
        assert_eq!(polygon_centroid(&square), Some((1.0, 1.0)));
    }

    #[test]
    fn test_clockwise_ring() {
        let square = vec![(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)];
        assert_eq!(polygon_centroid(&square), Some((1.0, 1.0)));
    }

    #[test]
    fn test_explicitly_closed_ring() {
        // GeoJSON rings repeat the first point; the zero-length edge adds nothing
        let ring = vec![(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0), (0.0, 0.0)];
        assert_eq!(polygon_centroid(&ring), Some((2.0, 1.0)));
    }

    #[test]
    fn test_identical_points() {
        let ring = vec![(17.5, 48.2); 4];
        assert_eq!(polygon_centroid(&ring), Some((17.5, 48.2)));
    }

    #[test]
    fn test_collinear_falls_back_to_first_vertex() {
        let ring = vec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)];
        assert_eq!(polygon_centroid(&ring), Some((1.0, 1.0)));
    }

    #[test]
    fn test_single_point() {
        assert_eq!(polygon_centroid(&[(3.0, 4.0)]), Some((3.0, 4.0)));
    }

    #[test]
    fn test_empty() {
        assert_eq!(polygon_centroid(&[]), None);
    }

    #[test]
    fn test_matches_geo_for_concave_ring() {
        let ring = vec![
            (0.0, 0.0),
            (6.0, 0.0),
            (6.0, 4.0),
            (3.0, 1.5),
            (0.0, 4.0),
        ];
        let (x, y) = polygon_centroid(&ring).unwrap();

        let polygon = Polygon::new(LineString::from(ring), vec![]);
        let expected = polygon.centroid().unwrap();
        assert!((x - expected.x()).abs() < 1e-9);
        assert!((y - expected.y()).abs() < 1e-9);
    }
}
