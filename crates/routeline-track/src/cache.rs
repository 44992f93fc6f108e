//! The route render cache.
//!
//! A [`RouteRenderCache`] owns up to two display lists for one route:
//! the remaining route (line, closing symbols, turn arrows) and the
//! closest segment running from the matched position to the next route
//! vertex. On each [`update`](RouteRenderCache::update) it works out
//! which of the two is stale and regenerates only that:
//!
//! | condition                                   | work done          |
//! |---------------------------------------------|--------------------|
//! | same input, same scale, fully cached        | nothing            |
//! | too little route left after matched index   | release everything |
//! | new matched index, new scale, or empty      | full rebuild       |
//! | otherwise (only the position moved)         | closest segment    |
//!
//! The closest-segment list is cleared and redrawn in place rather than
//! recreated, so steady movement along one segment allocates nothing on
//! the renderer side.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::arrow::arrow_points;
use crate::planner::plan_arrows;
use crate::render::{DisplayList, DisplayListId, Pen, Renderer};
use crate::simplify::transform_and_simplify;
use crate::style::{ClosingSymbol, RouteEnd, RouteStyle};
use crate::transform::{AffineTransform, transform_point, transform_points};
use crate::types::{ClipError, MatchedPosition, Point, Polyline, Turn};

/// One position/view update from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateEvent {
    /// Latest matched position. Unmatched fixes are ignored for
    /// positioning.
    pub matched: MatchedPosition,
    /// Integer zoom level of the view.
    pub draw_scale: i32,
    /// Set by the host when the view scale changed since the last
    /// update.
    pub scale_changed: bool,
    /// Display density multiplier applied to arrow sizes.
    pub visual_scale: f64,
    /// Route space to screen space.
    pub transform: AffineTransform<f64>,
}

impl UpdateEvent {
    /// An event at `draw_scale` with no scale change and a visual scale
    /// of 1.
    #[must_use]
    pub const fn new(
        matched: MatchedPosition,
        draw_scale: i32,
        transform: AffineTransform<f64>,
    ) -> Self {
        Self {
            matched,
            draw_scale,
            scale_changed: false,
            visual_scale: 1.0,
            transform,
        }
    }

    /// Mark the view scale as changed.
    #[must_use]
    pub const fn with_scale_changed(mut self, changed: bool) -> Self {
        self.scale_changed = changed;
        self
    }

    /// Set the display density multiplier applied to arrow sizes.
    #[must_use]
    pub const fn with_visual_scale(mut self, visual_scale: f64) -> Self {
        self.visual_scale = visual_scale;
        self
    }
}

/// What an [`update`](RouteRenderCache::update) regenerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Cached geometry was still valid.
    Unchanged,
    /// Only the closest segment was redrawn.
    ClosestSegment,
    /// The route list was rebuilt along with the closest segment.
    FullRebuild {
        /// Turn arrows drawn.
        arrows: usize,
        /// Points in the simplified remaining route.
        route_points: usize,
    },
    /// Too little route is left; all geometry was released.
    Discarded,
}

/// Observable cache state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheStateKind {
    /// Nothing cached.
    Empty,
    /// Route geometry cached; the closest segment must be redrawn.
    ClosestOnly,
    /// Both lists valid.
    FullyCached,
}

#[derive(Debug)]
struct RouteArtifact {
    list: DisplayList,
    matched_index: usize,
    draw_scale: i32,
}

impl RouteArtifact {
    const fn is_valid_for(&self, matched_index: usize, event: &UpdateEvent) -> bool {
        !event.scale_changed
            && self.matched_index == matched_index
            && self.draw_scale == event.draw_scale
    }
}

#[derive(Debug)]
struct ClosestArtifact {
    list: DisplayList,
    segment: [Point; 2],
}

#[derive(Debug, Default)]
enum CacheState {
    #[default]
    Empty,
    ClosestOnly {
        route: RouteArtifact,
        closest: ClosestArtifact,
    },
    FullyCached {
        route: RouteArtifact,
        closest: ClosestArtifact,
    },
}

/// Cached rendering for one navigation route.
///
/// Display lists are renderer resources: call
/// [`clear`](Self::clear) before dropping the cache, or the lists leak
/// on the renderer side.
#[derive(Debug)]
pub struct RouteRenderCache {
    route: Polyline,
    turns: Vec<Turn>,
    style: RouteStyle,
    begin_symbols: Vec<ClosingSymbol>,
    end_symbols: Vec<ClosingSymbol>,
    relevant: MatchedPosition,
    last_input: Option<MatchedPosition>,
    state: CacheState,
}

impl RouteRenderCache {
    /// An empty cache for `route` with its turn geometry.
    #[must_use]
    pub fn new(route: Polyline, turns: Vec<Turn>, style: RouteStyle) -> Self {
        Self {
            route,
            turns,
            style,
            begin_symbols: Vec::new(),
            end_symbols: Vec::new(),
            relevant: MatchedPosition::unmatched(),
            last_input: None,
            state: CacheState::Empty,
        }
    }

    /// The route being tracked.
    #[must_use]
    pub const fn route(&self) -> &Polyline {
        &self.route
    }

    /// Turn geometry for the route, in route order.
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The style used for the next rebuild.
    #[must_use]
    pub const fn style(&self) -> &RouteStyle {
        &self.style
    }

    /// The last matched position seen, or an unmatched position if none
    /// has been seen since the route was set.
    #[must_use]
    pub const fn relevant_position(&self) -> MatchedPosition {
        self.relevant
    }

    /// Which display lists are currently valid.
    #[must_use]
    pub const fn state(&self) -> CacheStateKind {
        match self.state {
            CacheState::Empty => CacheStateKind::Empty,
            CacheState::ClosestOnly { .. } => CacheStateKind::ClosestOnly,
            CacheState::FullyCached { .. } => CacheStateKind::FullyCached,
        }
    }

    /// Whether both display lists are valid.
    #[must_use]
    pub const fn has_display_lists(&self) -> bool {
        matches!(self.state, CacheState::FullyCached { .. })
    }

    /// Live display lists in draw order: route, then closest segment.
    #[must_use]
    pub fn display_lists(&self) -> Vec<DisplayListId> {
        match &self.state {
            CacheState::Empty => Vec::new(),
            CacheState::ClosestOnly { route, closest }
            | CacheState::FullyCached { route, closest } => {
                vec![route.list.id(), closest.list.id()]
            }
        }
    }

    /// The closest segment last drawn, in route space.
    #[must_use]
    pub const fn closest_segment(&self) -> Option<[Point; 2]> {
        match &self.state {
            CacheState::Empty => None,
            CacheState::ClosestOnly { closest, .. } | CacheState::FullyCached { closest, .. } => {
                Some(closest.segment)
            }
        }
    }

    /// Add a symbol drawn at one end of the route on the next rebuild.
    pub fn add_closing_symbol(&mut self, end: RouteEnd, symbol: ClosingSymbol) {
        match end {
            RouteEnd::Begin => self.begin_symbols.push(symbol),
            RouteEnd::End => self.end_symbols.push(symbol),
        }
    }

    /// Replace the route and its turns, releasing all cached geometry
    /// and forgetting the remembered matched position.
    pub fn set_route<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        route: Polyline,
        turns: Vec<Turn>,
    ) {
        self.clear(renderer);
        self.route = route;
        self.turns = turns;
        self.relevant = MatchedPosition::unmatched();
        self.last_input = None;
    }

    /// Replace the style. Cached geometry is released.
    pub fn set_style<R: Renderer + ?Sized>(&mut self, renderer: &mut R, style: RouteStyle) {
        self.clear(renderer);
        self.style = style;
    }

    /// Force the closest segment to be redrawn on the next update even
    /// if the input has not changed.
    pub fn invalidate_closest_segment(&mut self) {
        self.state = match std::mem::take(&mut self.state) {
            CacheState::FullyCached { route, closest } => {
                CacheState::ClosestOnly { route, closest }
            }
            other => other,
        };
    }

    /// Release both display lists.
    pub fn clear<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        match std::mem::take(&mut self.state) {
            CacheState::Empty => {}
            CacheState::ClosestOnly { route, closest }
            | CacheState::FullyCached { route, closest } => {
                route.list.release(renderer);
                closest.list.release(renderer);
            }
        }
    }

    /// Bring the cached display lists in line with `event`.
    pub fn update<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        event: &UpdateEvent,
    ) -> UpdateOutcome {
        if self.is_current(event) {
            trace!("route track unchanged at index {}", self.relevant.route_index);
            return UpdateOutcome::Unchanged;
        }

        self.last_input = Some(event.matched);
        if event.matched.is_matched {
            self.relevant = event.matched;
        }

        let current = self.relevant.route_index;
        if let Err(err) = self.check_drawable(current) {
            debug!("discarding route track at index {current}: {err}");
            self.clear(renderer);
            return UpdateOutcome::Discarded;
        }

        let (route, closest) = match std::mem::take(&mut self.state) {
            CacheState::Empty => (None, None),
            CacheState::ClosestOnly { route, closest }
            | CacheState::FullyCached { route, closest } => (Some(route), Some(closest)),
        };

        renderer.begin_frame();
        let (route, rebuilt) = match route {
            Some(route) if route.is_valid_for(current, event) => (route, None),
            stale => {
                if let Some(stale) = stale {
                    stale.list.release(renderer);
                }
                let (route, arrows, route_points) = self.build_route(renderer, event, current);
                (route, Some((arrows, route_points)))
            }
        };
        let closest = self.draw_closest_segment(renderer, closest, event, current);
        renderer.select_display_list(None);
        renderer.end_frame();

        self.state = CacheState::FullyCached { route, closest };

        match rebuilt {
            Some((arrows, route_points)) => UpdateOutcome::FullRebuild {
                arrows,
                route_points,
            },
            None => UpdateOutcome::ClosestSegment,
        }
    }

    fn is_current(&self, event: &UpdateEvent) -> bool {
        let CacheState::FullyCached { route, .. } = &self.state else {
            return false;
        };
        !event.scale_changed
            && route.draw_scale == event.draw_scale
            && self.last_input == Some(event.matched)
    }

    /// At least two route points must remain past `current` for the
    /// remaining route and the closest segment to be drawable.
    const fn check_drawable(&self, current: usize) -> Result<(), ClipError> {
        let len = self.route.len();
        if len < 2 || current.saturating_add(2) >= len {
            Err(ClipError::DegenerateRoute)
        } else {
            Ok(())
        }
    }

    fn build_route<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        event: &UpdateEvent,
        current: usize,
    ) -> (RouteArtifact, usize, usize) {
        let list = DisplayList::create(renderer);
        list.select(renderer);

        let remaining = transform_and_simplify(
            &event.transform,
            &self.route.points()[current + 1..],
            self.style.simplify_tolerance,
        );
        self.stroke_outlines(renderer, &remaining);
        self.draw_closing_symbols(renderer, &event.transform);

        let arrows = if self.style.draws_arrows(event.draw_scale) {
            self.draw_arrows(renderer, event, current)
        } else {
            0
        };

        debug!(
            "rebuilt route track from index {current} at scale {}: {} points, {arrows} arrows",
            event.draw_scale,
            remaining.len(),
        );

        let artifact = RouteArtifact {
            list,
            matched_index: current,
            draw_scale: event.draw_scale,
        };
        (artifact, arrows, remaining.len())
    }

    fn draw_closing_symbols<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        transform: &AffineTransform<f64>,
    ) {
        let ends = [
            (self.route.first(), &self.begin_symbols),
            (self.route.last(), &self.end_symbols),
        ];
        for (pivot, symbols) in ends {
            let Some(&pivot) = pivot else { continue };
            let pivot = transform_point(transform, pivot);
            for symbol in symbols {
                renderer.draw_symbol(pivot, &symbol.icon, symbol.anchor, symbol.depth);
            }
        }
    }

    fn draw_arrows<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        event: &UpdateEvent,
        current: usize,
    ) -> usize {
        let scale = event.visual_scale;
        let style = &self.style;
        let body_pen = Pen {
            color: style.arrow_color,
            width: style.arrow_body_width * scale,
        };
        let head_width = style.arrow_width * scale;
        let head_length = style.arrow_length * scale;

        let mut drawn = 0;
        for arrow in plan_arrows(
            &self.turns,
            current,
            &event.transform,
            style.arrow_lengths(scale),
        ) {
            renderer.draw_path(arrow.body.points(), body_pen, style.arrow_depth);
            let head = arrow_points(arrow.direction, head_width, head_length);
            renderer.draw_convex_polygon(&head, style.arrow_color, style.arrow_depth);
            drawn += 1;
        }
        drawn
    }

    fn draw_closest_segment<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        previous: Option<ClosestArtifact>,
        event: &UpdateEvent,
        current: usize,
    ) -> ClosestArtifact {
        let points = self.route.points();
        let start = if self.relevant.is_matched {
            self.relevant.position
        } else {
            points[current]
        };
        let segment = [start, points[current + 1]];

        let list = match previous {
            Some(previous) => {
                previous.list.clear(renderer);
                previous.list
            }
            None => DisplayList::create(renderer),
        };
        list.select(renderer);
        self.stroke_outlines(renderer, &transform_points(&event.transform, &segment));

        ClosestArtifact { list, segment }
    }

    fn stroke_outlines<R: Renderer + ?Sized>(&self, renderer: &mut R, points: &[Point]) {
        for &pen in &self.style.outlines {
            renderer.draw_path(points, pen, self.style.route_depth);
        }
    }
}
