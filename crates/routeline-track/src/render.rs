//! The seam between route-track geometry and whatever paints it.
//!
//! The core never paints pixels. It asks a [`Renderer`] for display
//! lists, selects one, and issues draw calls into it. Handles to those
//! lists are owned through [`DisplayList`], which can only be given
//! back via [`DisplayList::release`], so every replacement path in the
//! render cache goes through the same release point.
//!
//! [`Recorder`] is an in-memory renderer that keeps the draw commands
//! of every live list and counts list churn. Tests use it to observe
//! cache behaviour and the export crate turns its contents into SVG or
//! PNG.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Opaque identifier of a renderer-owned display list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DisplayListId(pub u64);

impl std::fmt::Display for DisplayListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 is opaque).
    pub a: u8,
}

impl Color {
    /// Create a colour from its four channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb` notation, ignoring alpha.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a fraction in `[0, 1]`.
    #[must_use]
    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

/// Stroke settings for a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    /// Stroke colour.
    pub color: Color,
    /// Stroke width in screen pixels.
    pub width: f64,
}

/// Where a symbol sits relative to its pivot point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anchor {
    /// Centred on the pivot.
    #[default]
    Center,
    /// Left of the pivot.
    Left,
    /// Right of the pivot.
    Right,
    /// Above the pivot.
    Top,
    /// Below the pivot.
    Bottom,
    /// Above and left of the pivot.
    TopLeft,
    /// Above and right of the pivot.
    TopRight,
    /// Below and left of the pivot.
    BottomLeft,
    /// Below and right of the pivot.
    BottomRight,
}

impl Anchor {
    /// Unit offset of the symbol centre from its pivot, in screen axes
    /// (y grows downward).
    #[must_use]
    pub const fn offset(self) -> (f64, f64) {
        match self {
            Self::Center => (0.0, 0.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::Top => (0.0, -1.0),
            Self::Bottom => (0.0, 1.0),
            Self::TopLeft => (-1.0, -1.0),
            Self::TopRight => (1.0, -1.0),
            Self::BottomLeft => (-1.0, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }
}

/// Primitive drawing operations plus display-list management.
///
/// Draw calls go into the currently selected display list, or straight
/// to the frame when none is selected.
pub trait Renderer {
    /// Start a batch of display-list edits.
    fn begin_frame(&mut self);

    /// Finish the batch started by [`begin_frame`](Self::begin_frame).
    fn end_frame(&mut self);

    /// Allocate a new, empty display list.
    fn create_display_list(&mut self) -> DisplayListId;

    /// Direct subsequent draw calls into `list` (`None` draws directly).
    fn select_display_list(&mut self, list: Option<DisplayListId>);

    /// Drop every command recorded in `list`, keeping the list alive.
    fn clear_display_list(&mut self, list: DisplayListId);

    /// Free `list`. The id must not be used afterwards.
    fn delete_display_list(&mut self, list: DisplayListId);

    /// Stroke an open path.
    fn draw_path(&mut self, points: &[Point], pen: Pen, depth: f64);

    /// Fill a convex polygon.
    fn draw_convex_polygon(&mut self, points: &[Point], color: Color, depth: f64);

    /// Place the icon named `icon` at `pivot`.
    fn draw_symbol(&mut self, pivot: Point, icon: &str, anchor: Anchor, depth: f64);
}

/// Owning handle to a display list.
///
/// Not `Clone`: exactly one owner holds each list, and the list goes
/// back to the renderer only through [`release`](Self::release).
/// Dropping a handle without releasing it leaks the list on the
/// renderer side and logs a warning.
#[derive(Debug)]
#[must_use = "a display list must be released back to its renderer"]
pub struct DisplayList {
    id: DisplayListId,
}

impl DisplayList {
    /// Ask `renderer` for a new display list.
    pub fn create<R: Renderer + ?Sized>(renderer: &mut R) -> Self {
        Self {
            id: renderer.create_display_list(),
        }
    }

    /// The renderer-side id of this list.
    #[must_use]
    pub const fn id(&self) -> DisplayListId {
        self.id
    }

    /// Direct subsequent draw calls into this list.
    pub fn select<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.select_display_list(Some(self.id));
    }

    /// Empty this list so it can be redrawn in place.
    pub fn clear<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.clear_display_list(self.id);
    }

    /// Give the list back to `renderer`.
    pub fn release<R: Renderer + ?Sized>(self, renderer: &mut R) {
        renderer.delete_display_list(self.id);
        std::mem::forget(self);
    }
}

impl Drop for DisplayList {
    fn drop(&mut self) {
        warn!("display list {} dropped without being released", self.id);
    }
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// A stroked open path.
    Path {
        points: Vec<Point>,
        pen: Pen,
        depth: f64,
    },
    /// A filled convex polygon.
    ConvexPolygon {
        points: Vec<Point>,
        color: Color,
        depth: f64,
    },
    /// A placed icon.
    Symbol {
        pivot: Point,
        icon: String,
        anchor: Anchor,
        depth: f64,
    },
}

impl DrawCommand {
    /// Depth the command was issued at.
    #[must_use]
    pub const fn depth(&self) -> f64 {
        match self {
            Self::Path { depth, .. } | Self::ConvexPolygon { depth, .. } | Self::Symbol { depth, .. } => {
                *depth
            }
        }
    }
}

/// Display-list churn counters kept by [`Recorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecorderStats {
    /// Lists created.
    pub created: usize,
    /// Lists deleted.
    pub deleted: usize,
    /// Lists cleared for in-place redraw.
    pub cleared: usize,
    /// Completed frames.
    pub frames: usize,
    /// Draw calls issued, into lists or directly.
    pub draw_calls: usize,
}

/// In-memory [`Renderer`] that records draw commands per display list.
#[derive(Debug, Default)]
pub struct Recorder {
    next_id: u64,
    lists: BTreeMap<DisplayListId, Vec<DrawCommand>>,
    immediate: Vec<DrawCommand>,
    selected: Option<DisplayListId>,
    stats: RecorderStats,
}

impl Recorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded in `list`, if it is alive.
    #[must_use]
    pub fn commands(&self, list: DisplayListId) -> Option<&[DrawCommand]> {
        self.lists.get(&list).map(Vec::as_slice)
    }

    /// Commands drawn with no display list selected.
    #[must_use]
    pub fn immediate(&self) -> &[DrawCommand] {
        &self.immediate
    }

    /// Ids of all live display lists, in creation order.
    pub fn live_lists(&self) -> impl Iterator<Item = DisplayListId> + '_ {
        self.lists.keys().copied()
    }

    /// Number of live display lists.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.lists.len()
    }

    /// Cumulative churn counters.
    #[must_use]
    pub const fn stats(&self) -> RecorderStats {
        self.stats
    }

    /// The concatenated commands of `lists`, in the given order.
    /// Ids that are not alive are skipped.
    #[must_use]
    pub fn scene(&self, lists: &[DisplayListId]) -> Vec<DrawCommand> {
        lists
            .iter()
            .filter_map(|id| self.lists.get(id))
            .flatten()
            .cloned()
            .collect()
    }

    fn record(&mut self, command: DrawCommand) {
        self.stats.draw_calls += 1;
        match self.selected {
            Some(id) => match self.lists.get_mut(&id) {
                Some(list) => list.push(command),
                None => warn!("draw into unknown display list {id} ignored"),
            },
            None => self.immediate.push(command),
        }
    }
}

impl Renderer for Recorder {
    fn begin_frame(&mut self) {
        self.immediate.clear();
    }

    fn end_frame(&mut self) {
        self.stats.frames += 1;
    }

    fn create_display_list(&mut self) -> DisplayListId {
        let id = DisplayListId(self.next_id);
        self.next_id += 1;
        self.lists.insert(id, Vec::new());
        self.stats.created += 1;
        id
    }

    fn select_display_list(&mut self, list: Option<DisplayListId>) {
        self.selected = list;
    }

    fn clear_display_list(&mut self, list: DisplayListId) {
        if let Some(commands) = self.lists.get_mut(&list) {
            commands.clear();
            self.stats.cleared += 1;
        }
    }

    fn delete_display_list(&mut self, list: DisplayListId) {
        if self.lists.remove(&list).is_some() {
            self.stats.deleted += 1;
        } else {
            warn!("delete of unknown display list {list}");
        }
        if self.selected == Some(list) {
            self.selected = None;
        }
    }

    fn draw_path(&mut self, points: &[Point], pen: Pen, depth: f64) {
        self.record(DrawCommand::Path {
            points: points.to_vec(),
            pen,
            depth,
        });
    }

    fn draw_convex_polygon(&mut self, points: &[Point], color: Color, depth: f64) {
        self.record(DrawCommand::ConvexPolygon {
            points: points.to_vec(),
            color,
            depth,
        });
    }

    fn draw_symbol(&mut self, pivot: Point, icon: &str, anchor: Anchor, depth: f64) {
        self.record(DrawCommand::Symbol {
            pivot,
            icon: icon.to_owned(),
            anchor,
            depth,
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BLACK: Color = Color::rgba(0, 0, 0, 255);

    fn segment() -> Vec<Point> {
        vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]
    }

    #[test]
    fn color_hex_and_opacity() {
        let c = Color::rgba(0, 0, 128, 255);
        assert_eq!(c.to_hex(), "#000080");
        assert!((c.opacity() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn draws_land_in_selected_list() {
        let mut r = Recorder::new();
        let list = DisplayList::create(&mut r);
        list.select(&mut r);
        r.draw_path(&segment(), Pen { color: BLACK, width: 2.0 }, 1.0);
        r.select_display_list(None);
        r.draw_symbol(Point::new(5.0, 5.0), "pin", Anchor::Top, 3.0);

        assert_eq!(r.commands(list.id()).unwrap().len(), 1);
        assert_eq!(r.immediate().len(), 1);
        assert_eq!(r.stats().draw_calls, 2);
        list.release(&mut r);
    }

    #[test]
    fn release_deletes_exactly_once() {
        let mut r = Recorder::new();
        let list = DisplayList::create(&mut r);
        let id = list.id();
        list.release(&mut r);
        assert!(r.commands(id).is_none());
        assert_eq!(r.stats().created, 1);
        assert_eq!(r.stats().deleted, 1);
        assert_eq!(r.live_count(), 0);
    }

    #[test]
    fn clear_keeps_list_alive() {
        let mut r = Recorder::new();
        let list = DisplayList::create(&mut r);
        list.select(&mut r);
        r.draw_convex_polygon(&segment(), BLACK, 0.0);
        list.clear(&mut r);
        assert_eq!(r.commands(list.id()).unwrap().len(), 0);
        assert_eq!(r.stats().cleared, 1);
        assert_eq!(r.live_count(), 1);
        list.release(&mut r);
    }

    #[test]
    fn scene_concatenates_in_order() {
        let mut r = Recorder::new();
        let a = DisplayList::create(&mut r);
        let b = DisplayList::create(&mut r);
        b.select(&mut r);
        r.draw_symbol(Point::new(0.0, 0.0), "end", Anchor::Center, 2.0);
        a.select(&mut r);
        r.draw_path(&segment(), Pen { color: BLACK, width: 1.0 }, 1.0);

        let scene = r.scene(&[a.id(), b.id(), DisplayListId(99)]);
        assert_eq!(scene.len(), 2);
        assert!(matches!(scene[0], DrawCommand::Path { .. }));
        assert!(matches!(scene[1], DrawCommand::Symbol { .. }));
        assert!((scene[1].depth() - 2.0).abs() < f64::EPSILON);
        a.release(&mut r);
        b.release(&mut r);
    }

    #[test]
    fn deleting_selected_list_resets_selection() {
        let mut r = Recorder::new();
        let list = DisplayList::create(&mut r);
        list.select(&mut r);
        list.release(&mut r);
        r.draw_path(&segment(), Pen { color: BLACK, width: 1.0 }, 0.0);
        assert_eq!(r.immediate().len(), 1);
    }

    #[test]
    fn anchor_offsets_point_away_from_pivot() {
        assert_eq!(Anchor::Center.offset(), (0.0, 0.0));
        assert_eq!(Anchor::TopRight.offset(), (1.0, -1.0));
        assert_eq!(Anchor::default(), Anchor::Center);
    }
}
