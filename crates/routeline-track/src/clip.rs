//! Clipping the road geometry around a turn into an arrow body.
//!
//! Given the local geometry of a turn and the index of the turn vertex
//! inside it, [`clip_arrow`] keeps `before_turn` of arc length ahead of
//! the vertex and `after_turn` past it, and works out the axis for the
//! arrowhead that continues from the cut end. Each side is one call to
//! the directional walk in [`crate::sample`], so the failure policy
//! (run out of points, degenerate segment) is shared by both.

use serde::{Deserialize, Serialize};

use crate::sample::{MIN_SEGMENT_LENGTH, point_at_distance};
use crate::types::{ArrowDirection, ClipError, Direction, Point, Polyline};

/// Arc lengths that shape one turn arrow, already in the units of the
/// geometry being clipped (screen pixels once transformed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowLengths {
    /// Route kept before the turn vertex.
    pub before_turn: f64,
    /// Route kept after the turn vertex; the arrowhead starts here.
    pub after_turn: f64,
    /// Length of the arrowhead beyond the cut end.
    pub arrow_length: f64,
}

impl ArrowLengths {
    /// Multiply every length by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            before_turn: self.before_turn * factor,
            after_turn: self.after_turn * factor,
            arrow_length: self.arrow_length * factor,
        }
    }
}

/// A clipped arrow body and the axis for its head.
#[derive(Debug, Clone, PartialEq)]
pub struct ClippedArrow {
    /// The geometry from `before_turn` ahead of the turn to `after_turn`
    /// past it.
    pub body: Polyline,
    /// Axis of the arrowhead, anchored at the body's last point.
    pub direction: ArrowDirection,
}

/// Clip `points` around `turn_index` into an arrow body plus head axis.
///
/// 1. Walk forward `after_turn` to find the cut end, and forward
///    `after_turn + arrow_length` to find the arrow tip.
/// 2. Truncate after the cut end, inserting it when it falls inside a
///    segment.
/// 3. Mirror the tip through the cut end to get the axis
///    `(2 * end - tip, end)`, so the head starts exactly where the
///    visible body stops.
/// 4. Walk backward `before_turn` and truncate the start the same way.
///
/// # Errors
///
/// Returns [`ClipError::InsufficientLength`] when either walk runs out
/// of points: the turn is within `after_turn + arrow_length` of the end
/// or within `before_turn` of the start. Returns
/// [`ClipError::DegenerateSegment`] when a segment that must supply a
/// direction has near-zero length.
pub fn clip_arrow(
    points: &[Point],
    turn_index: usize,
    lengths: ArrowLengths,
) -> Result<ClippedArrow, ClipError> {
    if points.len() < 2 || turn_index >= points.len() {
        return Err(ClipError::InsufficientLength);
    }

    let end = point_at_distance(points, turn_index, Direction::Forward, lengths.after_turn)?;
    let tip = point_at_distance(
        points,
        turn_index,
        Direction::Forward,
        lengths.after_turn + lengths.arrow_length,
    )?;
    if end.point.distance(tip.point) < MIN_SEGMENT_LENGTH {
        return Err(ClipError::DegenerateSegment);
    }

    let mut body = Vec::with_capacity(end.segment_end + 1);
    body.extend_from_slice(&points[..end.segment_end]);
    body.push(end.point);

    let direction = ArrowDirection {
        tail: end.point - (tip.point - end.point),
        head: end.point,
    };

    let start = point_at_distance(&body, turn_index, Direction::Backward, lengths.before_turn)?;
    let mut body = body.split_off(start.segment_end);
    body[0] = start.point;

    Ok(ClippedArrow {
        body: Polyline::new(body),
        direction,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn poly(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn lengths(before_turn: f64, after_turn: f64, arrow_length: f64) -> ArrowLengths {
        ArrowLengths {
            before_turn,
            after_turn,
            arrow_length,
        }
    }

    #[test]
    fn right_angle_turn_clips_two_units_each_side() {
        let pts = poly(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let clipped = clip_arrow(&pts, 1, lengths(2.0, 2.0, 3.0)).unwrap();
        let body = clipped.body.points();
        assert_eq!(body.len(), 3);
        assert!(body[0].almost_equal(Point::new(8.0, 0.0)));
        assert_eq!(body[1], Point::new(10.0, 0.0));
        assert!(body[2].almost_equal(Point::new(10.0, 2.0)));

        let turn = Point::new(10.0, 0.0);
        assert!((body[0].distance(turn) - 2.0).abs() < 1e-9);
        assert!((body[2].distance(turn) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn arrow_axis_is_mirrored_through_cut_end() {
        let pts = poly(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let clipped = clip_arrow(&pts, 1, lengths(2.0, 2.0, 3.0)).unwrap();
        // Tip is at (10, 5); the axis runs from (10, -1) to the cut end.
        assert!(clipped.direction.head.almost_equal(Point::new(10.0, 2.0)));
        assert!(clipped.direction.tail.almost_equal(Point::new(10.0, -1.0)));
        assert_eq!(clipped.direction.head, *clipped.body.last().unwrap());
    }

    #[test]
    fn arrow_tip_on_later_segment() {
        let pts = poly(&[(0.0, 0.0), (10.0, 0.0), (10.0, 3.0), (20.0, 3.0)]);
        let clipped = clip_arrow(&pts, 1, lengths(4.0, 2.0, 3.0)).unwrap();
        // Cut end at (10, 2); tip 2 units past the corner at (12, 3).
        let head = clipped.direction.head;
        let tail = clipped.direction.tail;
        assert!(head.almost_equal(Point::new(10.0, 2.0)));
        assert!(tail.almost_equal(Point::new(8.0, 1.0)));
        assert!(clipped.body.points()[0].almost_equal(Point::new(6.0, 0.0)));
        assert_eq!(clipped.body.len(), 3);
    }

    #[test]
    fn far_turn_always_succeeds_and_shortens() {
        let pts = poly(&[
            (0.0, 0.0),
            (40.0, 0.0),
            (50.0, 0.0),
            (50.0, 10.0),
            (50.0, 60.0),
            (90.0, 60.0),
        ]);
        let input = Polyline::new(pts.clone());
        let l = lengths(13.0, 13.0, 19.0);
        let clipped = clip_arrow(&pts, 2, l).unwrap();
        assert!(clipped.body.length() < input.length());
        assert!((clipped.body.length() - 26.0).abs() < 1e-9);
        assert!(
            !clipped
                .direction
                .tail
                .almost_equal(clipped.direction.head)
        );
    }

    #[test]
    fn cut_on_existing_vertex_is_not_duplicated() {
        let pts = poly(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (15.0, 0.0), (30.0, 0.0)]);
        let clipped = clip_arrow(&pts, 2, lengths(5.0, 5.0, 5.0)).unwrap();
        assert_eq!(
            clipped.body.points(),
            &[Point::new(5.0, 0.0), Point::new(10.0, 0.0), Point::new(15.0, 0.0)],
        );
    }

    #[test]
    fn fails_near_route_end() {
        let pts = poly(&[(0.0, 0.0), (10.0, 0.0), (10.0, 4.0)]);
        // after_turn + arrow_length = 5 > 4 remaining.
        assert_eq!(
            clip_arrow(&pts, 1, lengths(2.0, 2.0, 3.0)),
            Err(ClipError::InsufficientLength),
        );
        // Even the cut end does not fit.
        assert_eq!(
            clip_arrow(&pts, 1, lengths(2.0, 4.5, 3.0)),
            Err(ClipError::InsufficientLength),
        );
    }

    #[test]
    fn fails_near_route_start() {
        let pts = poly(&[(0.0, 0.0), (1.5, 0.0), (1.5, 10.0)]);
        assert_eq!(
            clip_arrow(&pts, 1, lengths(2.0, 2.0, 3.0)),
            Err(ClipError::InsufficientLength),
        );
    }

    #[test]
    fn turn_at_last_vertex_fails() {
        let pts = poly(&[(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(
            clip_arrow(&pts, 1, lengths(2.0, 2.0, 3.0)),
            Err(ClipError::InsufficientLength),
        );
    }

    #[test]
    fn zero_arrow_length_has_no_direction() {
        let pts = poly(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert_eq!(
            clip_arrow(&pts, 1, lengths(2.0, 2.0, 0.0)),
            Err(ClipError::DegenerateSegment),
        );
    }

    #[test]
    fn degenerate_segment_at_cut_fails() {
        // The cut end falls on a sliver segment shorter than the
        // minimum segment length.
        let pts = poly(&[(0.0, 0.0), (10.0, 0.0), (10.0, 2.0), (10.0, 2.0 + 5e-7), (10.0, 20.0)]);
        assert_eq!(
            clip_arrow(&pts, 1, lengths(2.0, 2.0 + 2e-7, 3.0)),
            Err(ClipError::DegenerateSegment),
        );
    }

    #[test]
    fn out_of_range_turn_index_fails() {
        let pts = poly(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert_eq!(
            clip_arrow(&pts, 3, lengths(1.0, 1.0, 1.0)),
            Err(ClipError::InsufficientLength),
        );
    }

    #[test]
    fn scaled_lengths_multiply_every_field() {
        let l = lengths(13.0, 13.0, 19.0).scaled(2.0);
        assert_eq!(l, lengths(26.0, 26.0, 38.0));
    }
}
