//! Remaining-route simplification (Ramer-Douglas-Peucker).
//!
//! The remaining route is transformed to screen space first and then
//! thinned, so the tolerance is in screen pixels and zooming out drops
//! vertices that would never be visible anyway.

use geo::{Coord, LineString, Simplify};

use crate::transform::{AffineTransform, transform_points};
use crate::types::Point;

/// Transform `points` to screen space and simplify the result.
#[must_use = "returns the simplified screen-space points"]
pub fn transform_and_simplify(
    transform: &AffineTransform<f64>,
    points: &[Point],
    tolerance: f64,
) -> Vec<Point> {
    simplify(&transform_points(transform, points), tolerance)
}

/// Simplify a point sequence using the Ramer-Douglas-Peucker algorithm.
///
/// Points within `tolerance` of the segment between their retained
/// neighbours are removed. The endpoints always survive. Fewer than 3
/// points, or a non-positive tolerance, return the input unchanged.
#[must_use = "returns the simplified points"]
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 || tolerance <= 0.0 {
        return points.to_vec();
    }

    let line: LineString<f64> = points.iter().map(|&p| Coord::from(p)).collect();
    line.simplify(tolerance).0.into_iter().map(Point::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn short_inputs_unchanged() {
        assert!(simplify(&[], 1.0).is_empty());
        let two = poly(&[(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(simplify(&two, 1.0), two);
    }

    #[test]
    fn straight_route_collapses_to_endpoints() {
        let pts = poly(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)]);
        assert_eq!(simplify(&pts, 0.1), poly(&[(0.0, 0.0), (4.0, 4.0)]));
    }

    #[test]
    fn corners_survive() {
        let pts = poly(&[(0.0, 0.0), (5.0, 0.05), (10.0, 0.0), (10.0, 10.0)]);
        assert_eq!(simplify(&pts, 0.5), poly(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
    }

    #[test]
    fn zero_tolerance_keeps_everything() {
        let pts = poly(&[(0.0, 0.0), (1.0, 0.1), (2.0, 0.0)]);
        assert_eq!(simplify(&pts, 0.0).len(), 3);
    }

    #[test]
    fn tolerance_is_applied_in_screen_space() {
        // A 0.4 unit bump survives a 1px tolerance only after the
        // transform scales it up to 4px.
        let pts = poly(&[(0.0, 0.0), (5.0, 0.4), (10.0, 0.0)]);
        let identity = AffineTransform::identity();
        let zoom = AffineTransform::new(10.0, 0.0, 0.0, 0.0, 10.0, 0.0);
        assert_eq!(transform_and_simplify(&identity, &pts, 1.0).len(), 2);
        assert_eq!(transform_and_simplify(&zoom, &pts, 1.0).len(), 3);
    }

    #[test]
    fn closed_loop_keeps_far_vertex() {
        let pts = poly(&[(0.0, 0.0), (3.0, 4.0), (0.0, 0.0)]);
        assert_eq!(simplify(&pts, 1.0), pts);
    }
}
