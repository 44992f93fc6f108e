//! Arc-length sampling along a point sequence.
//!
//! Walks from a start vertex in either direction, accumulating
//! Euclidean segment lengths until a target distance is covered, then
//! interpolates inside the segment that completed it. Both arrow clip
//! walks and the arrow tip lookup go through [`point_at_distance`].

use crate::types::{ClipError, Direction, Point, almost_equal};

/// Segments shorter than this carry no usable direction.
pub const MIN_SEGMENT_LENGTH: f64 = 1e-6;

/// Result of a successful [`point_at_distance`] walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// The point at the requested arc length from the start vertex.
    pub point: Point,
    /// Index of the far vertex of the segment that completed the walk.
    ///
    /// Equals the start index when the requested distance is zero.
    pub segment_end: usize,
    /// The requested distance landed on `points[segment_end]` itself
    /// (within tolerance), so no new point had to be interpolated.
    pub at_vertex: bool,
}

/// The point `dist` along the segment `a -> b`.
///
/// Returns `a` for a zero-length segment.
#[must_use]
pub fn point_at_segment(a: Point, b: Point, dist: f64) -> Point {
    let len = a.distance(b);
    if len == 0.0 {
        return a;
    }
    a + (b - a) * (dist / len)
}

/// Find the point at arc length `distance` from `points[start]`,
/// walking in `direction`.
///
/// # Errors
///
/// Returns [`ClipError::InsufficientLength`] when the walk runs off the
/// end of `points` (or `start` is out of range) before covering
/// `distance`. Returns [`ClipError::DegenerateSegment`] when the
/// segment that completes the walk is shorter than
/// [`MIN_SEGMENT_LENGTH`], so there is nothing to interpolate along.
pub fn point_at_distance(
    points: &[Point],
    start: usize,
    direction: Direction,
    distance: f64,
) -> Result<Sample, ClipError> {
    let Some(&origin) = points.get(start) else {
        return Err(ClipError::InsufficientLength);
    };

    let mut index = start;
    let mut previous = start;
    let mut walked = 0.0;
    let mut last_len = 0.0;
    while walked < distance && !almost_equal(walked, distance) {
        let next = direction
            .step(index, points.len())
            .ok_or(ClipError::InsufficientLength)?;
        last_len = points[index].distance(points[next]);
        walked += last_len;
        previous = index;
        index = next;
    }

    if index == start {
        return Ok(Sample {
            point: origin,
            segment_end: start,
            at_vertex: true,
        });
    }

    if last_len < MIN_SEGMENT_LENGTH {
        return Err(ClipError::DegenerateSegment);
    }

    if almost_equal(walked, distance) {
        return Ok(Sample {
            point: points[index],
            segment_end: index,
            at_vertex: true,
        });
    }

    let overshoot = walked - distance;
    Ok(Sample {
        point: point_at_segment(points[previous], points[index], last_len - overshoot),
        segment_end: index,
        at_vertex: false,
    })
}
