//! Arrowhead triangle geometry.

use crate::types::{ArrowDirection, Point};

/// The three corners of an arrowhead drawn along `direction`.
///
/// The base is centred on `direction.head`, perpendicular to the
/// `tail -> head` axis, reaching `width` to either side. The apex lies
/// `length` beyond the head. Corners are ordered left base, apex,
/// right base, so the triangle is convex and consistently wound.
///
/// A zero-length axis yields three copies of the head.
///
/// # Examples
///
/// ```
/// use routeline_track::{ArrowDirection, Point};
/// use routeline_track::arrow::arrow_points;
///
/// let direction = ArrowDirection {
///     tail: Point::new(0.0, 0.0),
///     head: Point::new(1.0, 0.0),
/// };
/// let [left, apex, right] = arrow_points(direction, 1.0, 1.0);
/// assert_eq!(left, Point::new(1.0, 1.0));
/// assert_eq!(apex, Point::new(2.0, 0.0));
/// assert_eq!(right, Point::new(1.0, -1.0));
/// ```
#[must_use]
pub fn arrow_points(direction: ArrowDirection, width: f64, length: f64) -> [Point; 3] {
    let axis = direction.head - direction.tail;
    let axis_len = axis.length();
    if axis_len == 0.0 {
        return [direction.head; 3];
    }

    let unit = axis * (1.0 / axis_len);
    let normal = Point::new(-unit.y, unit.x);
    [
        direction.head + normal * width,
        direction.head + unit * length,
        direction.head - normal * width,
    ]
}
