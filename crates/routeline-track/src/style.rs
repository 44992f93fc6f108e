//! Visual parameters for a route track.

use serde::{Deserialize, Serialize};

use crate::clip::ArrowLengths;
use crate::render::{Anchor, Color, Pen};

/// All tunable appearance parameters of a route track.
///
/// Arrow lengths and widths are given at a visual scale of 1 and are
/// multiplied by the display's visual scale at draw time. Outline
/// widths are used as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteStyle {
    /// Route kept before each turn vertex in an arrow body.
    pub before_turn: f64,
    /// Route kept after each turn vertex in an arrow body.
    pub after_turn: f64,
    /// Half-width of the arrowhead base.
    pub arrow_width: f64,
    /// Length of the arrowhead.
    pub arrow_length: f64,
    /// Stroke width of the arrow body.
    pub arrow_body_width: f64,
    /// Fill colour of the arrow body and head.
    pub arrow_color: Color,
    /// Draw depth of arrows.
    pub arrow_depth: f64,
    /// Pens the route line is stroked with, bottom first.
    pub outlines: Vec<Pen>,
    /// Draw depth of the route line and closest segment.
    pub route_depth: f64,
    /// Ramer-Douglas-Peucker tolerance for the remaining route, in
    /// screen pixels.
    pub simplify_tolerance: f64,
    /// Draw scale at or above which turn arrows are drawn.
    pub navigation_scale: i32,
}

impl RouteStyle {
    /// Default route outline colour.
    pub const ROUTE_COLOR: Color = Color::rgba(30, 150, 240, 255);

    /// Default arrow colour.
    pub const ARROW_COLOR: Color = Color::rgba(0, 0, 128, 255);

    /// Arrow clipping lengths at `visual_scale`.
    #[must_use]
    pub fn arrow_lengths(&self, visual_scale: f64) -> ArrowLengths {
        ArrowLengths {
            before_turn: self.before_turn,
            after_turn: self.after_turn,
            arrow_length: self.arrow_length,
        }
        .scaled(visual_scale)
    }

    /// Whether arrows are drawn at `draw_scale`.
    #[must_use]
    pub const fn draws_arrows(&self, draw_scale: i32) -> bool {
        draw_scale >= self.navigation_scale
    }
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            before_turn: 13.0,
            after_turn: 13.0,
            arrow_width: 10.0,
            arrow_length: 19.0,
            arrow_body_width: 8.0,
            arrow_color: Self::ARROW_COLOR,
            arrow_depth: 200.0,
            outlines: vec![Pen {
                color: Self::ROUTE_COLOR,
                width: 10.0,
            }],
            route_depth: 100.0,
            simplify_tolerance: 1.0,
            navigation_scale: 15,
        }
    }
}

/// Which end of the route a closing symbol marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteEnd {
    /// The route's first point.
    Begin,
    /// The route's last point.
    End,
}

/// An icon drawn at one end of the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingSymbol {
    /// Icon name understood by the renderer.
    pub icon: String,
    /// Placement relative to the route end.
    #[serde(default)]
    pub anchor: Anchor,
    /// Draw depth.
    pub depth: f64,
}
