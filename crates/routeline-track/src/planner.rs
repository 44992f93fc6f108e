//! Turn arrow planning for a full route rebuild.
//!
//! [`plan_arrows`] yields one [`TurnArrow`] per upcoming turn that can
//! be clipped, in route order. Turns behind the matched position are
//! skipped, and so is any turn whose geometry cannot fit an arrow.

use log::trace;

use crate::clip::{ArrowLengths, clip_arrow};
use crate::transform::{AffineTransform, transform_points};
use crate::types::{ArrowDirection, Polyline, Turn};

/// Drawable geometry for one turn arrow, in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnArrow {
    /// Index of the turn vertex within the full route.
    pub route_index: usize,
    /// The stroked arrow body.
    pub body: Polyline,
    /// Axis for the arrowhead triangle at the end of the body.
    pub direction: ArrowDirection,
}

/// Plan arrows for every turn at or after `matched_index`.
///
/// Each turn's local geometry is mapped through `transform` before
/// clipping, so `lengths` are screen-space lengths. The iterator is
/// lazy and finite; a turn that fails to clip (or clips to fewer than
/// two points) is left out rather than reported.
pub fn plan_arrows<'a>(
    turns: &'a [Turn],
    matched_index: usize,
    transform: &'a AffineTransform<f64>,
    lengths: ArrowLengths,
) -> impl Iterator<Item = TurnArrow> + 'a {
    turns
        .iter()
        .filter(move |turn| turn.route_index >= matched_index)
        .filter(|turn| !turn.points.is_empty())
        .filter_map(move |turn| {
            let screen = transform_points(transform, &turn.points);
            match clip_arrow(&screen, turn.turn_index, lengths) {
                Ok(clipped) if clipped.body.len() >= 2 => Some(TurnArrow {
                    route_index: turn.route_index,
                    body: clipped.body,
                    direction: clipped.direction,
                }),
                Ok(_) => {
                    trace!("turn at {} clipped to a single point", turn.route_index);
                    None
                }
                Err(err) => {
                    trace!("no arrow for turn at {}: {err}", turn.route_index);
                    None
                }
            }
        })
}
