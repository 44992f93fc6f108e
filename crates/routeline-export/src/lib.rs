//! routeline-export: Pure format serializers (sans-IO)
//!
//! Converts recorded [`DrawCommand`]s into output formats. Currently
//! supports SVG and PNG. Commands are painted in ascending depth order;
//! commands at equal depth keep their recorded order.

pub mod raster;
pub mod svg;

use routeline_track::DrawCommand;

pub use raster::{render, to_png};
pub use svg::{SvgMetadata, build_path_data, to_svg};

/// Output canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// Radius, in pixels, of the marker drawn for a symbol.
pub const SYMBOL_RADIUS: f64 = 6.0;

/// Errors from the export serializers.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The canvas has a zero or oversized dimension.
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(String),
}

/// `commands` sorted by ascending depth, stable within a depth.
#[must_use]
pub fn depth_sorted(commands: &[DrawCommand]) -> Vec<&DrawCommand> {
    let mut sorted: Vec<&DrawCommand> = commands.iter().collect();
    sorted.sort_by(|a, b| a.depth().total_cmp(&b.depth()));
    sorted
}

/// Centre of a symbol marker placed at `pivot` with `anchor`.
#[must_use]
pub fn symbol_center(
    pivot: routeline_track::Point,
    anchor: routeline_track::Anchor,
) -> routeline_track::Point {
    let (dx, dy) = anchor.offset();
    routeline_track::Point::new(pivot.x + dx * SYMBOL_RADIUS, pivot.y + dy * SYMBOL_RADIUS)
}
