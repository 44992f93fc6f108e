//! Route-space to screen-space transforms.
//!
//! The host supplies the current view as a [`geo::AffineTransform`];
//! this module only applies it to route points.

pub use geo::AffineTransform;

use crate::types::Point;

/// Apply `transform` to a single point.
#[must_use]
pub fn transform_point(transform: &AffineTransform<f64>, point: Point) -> Point {
    transform.apply(point.into()).into()
}

/// Apply `transform` to every point, preserving order.
#[must_use]
pub fn transform_points(transform: &AffineTransform<f64>, points: &[Point]) -> Vec<Point> {
    points
        .iter()
        .map(|&p| transform_point(transform, p))
        .collect()
}
