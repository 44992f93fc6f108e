//! Shared types for route-track geometry.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Absolute tolerance used by [`almost_equal`].
pub const ABS_TOLERANCE: f64 = 1e-9;

/// Relative tolerance used by [`almost_equal`], scaled by the larger
/// magnitude of the two operands.
pub const REL_TOLERANCE: f64 = 1e-9;

/// Compare two floats with a combined absolute/relative tolerance.
///
/// Route points come out of upstream simplification and screen
/// transforms, so exact equality is never meaningful for them.
#[must_use]
pub fn almost_equal(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs());
    (a - b).abs() <= ABS_TOLERANCE.max(REL_TOLERANCE * scale)
}

/// A 2D point in route (or, after transformation, screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Length of this point treated as a vector from the origin.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Both coordinates are [`almost_equal`].
    #[must_use]
    pub fn almost_equal(self, other: Self) -> bool {
        almost_equal(self.x, other.x) && almost_equal(self.y, other.y)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl From<Point> for geo::Coord<f64> {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<geo::Coord<f64>> for Point {
    fn from(c: geo::Coord<f64>) -> Self {
        Self::new(c.x, c.y)
    }
}

/// An ordered sequence of points: the full route or a piece of it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline(Vec<Point>);

impl Polyline {
    /// Create a new polyline from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the polyline has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the polyline.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Returns the point at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Point> {
        self.0.get(index).copied()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the polyline and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }

    /// Total Euclidean arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.0.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

impl From<Vec<Point>> for Polyline {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

/// A turn on the route, with the road geometry around it.
///
/// Computed once by the route builder; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Position of the turn vertex within the full route.
    pub route_index: usize,
    /// Road geometry around the turn, in route coordinates.
    pub points: Vec<Point>,
    /// Index of the turn vertex within `points`.
    pub turn_index: usize,
}

/// Where the user currently is on the route.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchedPosition {
    /// Whether map matching produced a fix on the route.
    pub is_matched: bool,
    /// Index of the route segment the user occupies.
    pub route_index: usize,
    /// Exact matched location. Only meaningful when `is_matched`.
    pub position: Point,
}

impl MatchedPosition {
    /// A matched fix on segment `route_index` at `position`.
    #[must_use]
    pub const fn matched(route_index: usize, position: Point) -> Self {
        Self {
            is_matched: true,
            route_index,
            position,
        }
    }

    /// The reset value: not matched, at the start of the route.
    #[must_use]
    pub const fn unmatched() -> Self {
        Self {
            is_matched: false,
            route_index: 0,
            position: Point::new(0.0, 0.0),
        }
    }
}

/// Axis along which an arrowhead triangle is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowDirection {
    /// Start of the axis.
    pub tail: Point,
    /// End of the axis; the arrowhead base sits here.
    pub head: Point,
}

/// Which way a walk along a polyline proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Toward increasing indices (the route end).
    Forward,
    /// Toward decreasing indices (the route start).
    Backward,
}

impl Direction {
    /// The index one step from `index` in this direction, or `None`
    /// when that would leave `0..len`.
    #[must_use]
    pub fn step(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Self::Forward => index.checked_add(1).filter(|&next| next < len),
            Self::Backward => index.checked_sub(1),
        }
    }
}

/// Why a sampling walk, an arrow clip, or a cache update produced
/// nothing.
///
/// Every variant is an expected outcome: callers skip the arrow or
/// clear the cached geometry, nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ClipError {
    /// The walk ran out of points before covering its distance.
    #[error("polyline too short to cover the requested distance")]
    InsufficientLength,

    /// A near-zero-length segment sits where a direction is needed.
    #[error("degenerate segment where a direction is required")]
    DegenerateSegment,

    /// Too few remaining route points to render anything.
    #[error("route has too few remaining points to render")]
    DegenerateRoute,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn almost_equal_absorbs_rounding() {
        assert!(almost_equal(0.1 + 0.2, 0.3));
        assert!(almost_equal(0.0, 1e-12));
        assert!(!almost_equal(0.0, 1e-6));
    }

    #[test]
    fn almost_equal_is_relative_for_large_values() {
        assert!(almost_equal(1.0e9, 1.0e9 + 0.5));
        assert!(!almost_equal(1.0e3, 1.0e3 + 0.5));
    }

    #[test]
    fn point_arithmetic() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert_eq!(b - a, Point::new(3.0, 4.0));
        assert_eq!(a + b, Point::new(5.0, 8.0));
        assert_eq!(a * 2.0, Point::new(2.0, 4.0));
        assert!(((b - a).length() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_geo_coord_conversion() {
        let p = Point::new(2.5, -1.0);
        let c: geo::Coord<f64> = p.into();
        assert_eq!(Point::from(c), p);
    }

    #[test]
    fn polyline_length_sums_segments() {
        let pl = Polyline::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]);
        assert!((pl.length() - 20.0).abs() < f64::EPSILON);
        assert_eq!(pl.len(), 3);
        assert_eq!(pl.get(1), Some(Point::new(10.0, 0.0)));
        assert_eq!(pl.get(3), None);
    }

    #[test]
    fn polyline_empty_has_zero_length() {
        let pl = Polyline::default();
        assert!(pl.is_empty());
        assert!(pl.first().is_none());
        assert!(pl.length().abs() < f64::EPSILON);
    }

    #[test]
    fn direction_step_stays_in_bounds() {
        assert_eq!(Direction::Forward.step(0, 3), Some(1));
        assert_eq!(Direction::Forward.step(2, 3), None);
        assert_eq!(Direction::Backward.step(2, 3), Some(1));
        assert_eq!(Direction::Backward.step(0, 3), None);
    }

    #[test]
    fn unmatched_resets_index() {
        let reset = MatchedPosition::unmatched();
        assert!(!reset.is_matched);
        assert_eq!(reset.route_index, 0);
    }

    #[test]
    fn error_display() {
        assert_eq!(
            ClipError::InsufficientLength.to_string(),
            "polyline too short to cover the requested distance",
        );
        assert_eq!(
            ClipError::DegenerateRoute.to_string(),
            "route has too few remaining points to render",
        );
    }

    #[test]
    fn turn_serde_round_trip() {
        let turn = Turn {
            route_index: 4,
            points: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
            turn_index: 1,
        };
        let json = serde_json::to_string(&turn).unwrap();
        let back: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(back, turn);
    }
}
