//! routeline-track: Route track rendering core (sans-IO).
//!
//! Turns a navigation route, its turn geometry and a stream of matched
//! positions into display-list draw calls:
//! remaining route line -> closing symbols -> turn arrows, plus a
//! separately cached closest segment from the matched position to the
//! next route vertex.
//!
//! This crate never paints pixels. Drawing goes through the
//! [`Renderer`] trait; [`render::Recorder`] is an in-memory renderer
//! and `routeline-export` turns its contents into SVG or PNG.
//!
//! # Typical use
//!
//! ```
//! use routeline_track::{
//!     AffineTransform, MatchedPosition, Point, Polyline, Recorder, RouteRenderCache,
//!     RouteStyle, UpdateEvent, UpdateOutcome,
//! };
//!
//! let route = Polyline::new(vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(100.0, 0.0),
//!     Point::new(100.0, 100.0),
//! ]);
//! let mut renderer = Recorder::new();
//! let mut cache = RouteRenderCache::new(route, Vec::new(), RouteStyle::default());
//!
//! let matched = MatchedPosition::matched(0, Point::new(20.0, 0.0));
//! let event = UpdateEvent::new(matched, 16, AffineTransform::identity());
//! assert!(matches!(
//!     cache.update(&mut renderer, &event),
//!     UpdateOutcome::FullRebuild { .. }
//! ));
//! assert_eq!(cache.update(&mut renderer, &event), UpdateOutcome::Unchanged);
//!
//! cache.clear(&mut renderer);
//! ```

pub mod arrow;
pub mod cache;
pub mod clip;
pub mod diagnostics;
pub mod planner;
pub mod render;
pub mod sample;
pub mod simplify;
pub mod style;
pub mod transform;
pub mod types;

pub use cache::{CacheStateKind, RouteRenderCache, UpdateEvent, UpdateOutcome};
pub use clip::{ArrowLengths, ClippedArrow, clip_arrow};
pub use planner::{TurnArrow, plan_arrows};
pub use render::{
    Anchor, Color, DisplayList, DisplayListId, DrawCommand, Pen, Recorder, RecorderStats, Renderer,
};
pub use style::{ClosingSymbol, RouteEnd, RouteStyle};
pub use transform::AffineTransform;
pub use types::{
    ArrowDirection, ClipError, Direction, MatchedPosition, Point, Polyline, Turn, almost_equal,
};
