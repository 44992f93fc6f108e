//! SVG export serializer.
//!
//! Converts recorded draw commands into an SVG string using the [`svg`]
//! crate for document construction, XML escaping, and path data
//! formatting.
//!
//! - paths become stroked `<path>` elements with round caps and joins,
//! - convex polygons become closed, filled `<path>` elements,
//! - symbols become a small marker `<circle>` inside a `<g>` carrying
//!   the icon name in `data-icon` and a `<title>`.
//!
//! Optional [`SvgMetadata`] embeds `<title>`, `<desc>` and the style
//! JSON for reproducibility.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Description, Element, Group, Path, Rectangle, Title};
use svg::node::{Node, Text, Value};

use routeline_track::{Color, DrawCommand, Point};

use crate::{Canvas, SYMBOL_RADIUS, depth_sorted, symbol_center};

/// Metadata to embed in the SVG document.
///
/// All fields are optional. Text values are XML-escaped automatically
/// by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized route style, emitted inside `<metadata>` wrapped in a
    /// namespaced `<routeline:style>` element.
    pub style_json: Option<&'a str>,
}

/// Build an SVG path `d` attribute string from a point sequence.
///
/// Uses `M` for the first point and `L` for subsequent points.
/// Returns an empty string for fewer than 2 points.
///
/// # Examples
///
/// ```
/// use routeline_track::Point;
/// use routeline_export::build_path_data;
///
/// let d = build_path_data(&[Point::new(10.0, 20.0), Point::new(30.0, 40.0)]);
/// assert_eq!(d, "M10,20 L30,40");
/// ```
#[must_use]
pub fn build_path_data(points: &[Point]) -> String {
    path_data(points).map_or_else(String::new, |data| String::from(Value::from(data)))
}

fn path_data(points: &[Point]) -> Option<Data> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let data = rest
        .iter()
        .fold(Data::new().move_to((first.x, first.y)), |data, p| {
            data.line_to((p.x, p.y))
        });
    Some(data)
}

/// Serialize draw commands into an SVG document of the given size.
///
/// Commands are emitted in ascending depth order. Paths and polygons
/// with fewer than 2 points are skipped. When `background` is given a
/// full-canvas `<rect>` is emitted first.
#[must_use]
pub fn to_svg(
    commands: &[DrawCommand],
    canvas: Canvas,
    background: Option<Color>,
    metadata: &SvgMetadata<'_>,
) -> String {
    let Canvas { width, height } = canvas;
    let mut doc = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", (0, 0, width, height));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(style_json) = metadata.style_json {
        let mut style_el = Element::new("routeline:style");
        style_el.assign("xmlns:routeline", "urn:routeline:style:1");
        style_el.append(Text::new(style_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(style_el);
        doc = doc.add(metadata_el);
    }

    if let Some(color) = background {
        doc = doc.add(
            Rectangle::new()
                .set("width", width)
                .set("height", height)
                .set("fill", color.to_hex())
                .set("fill-opacity", color.opacity()),
        );
    }

    for command in depth_sorted(commands) {
        match command {
            DrawCommand::Path { points, pen, .. } => {
                let Some(data) = path_data(points) else {
                    continue;
                };
                doc = doc.add(
                    Path::new()
                        .set("d", data)
                        .set("fill", "none")
                        .set("stroke", pen.color.to_hex())
                        .set("stroke-opacity", pen.color.opacity())
                        .set("stroke-width", pen.width)
                        .set("stroke-linecap", "round")
                        .set("stroke-linejoin", "round"),
                );
            }
            DrawCommand::ConvexPolygon { points, color, .. } => {
                let Some(data) = path_data(points) else {
                    continue;
                };
                doc = doc.add(
                    Path::new()
                        .set("d", data.close())
                        .set("fill", color.to_hex())
                        .set("fill-opacity", color.opacity()),
                );
            }
            DrawCommand::Symbol {
                pivot, icon, anchor, ..
            } => {
                let center = symbol_center(*pivot, *anchor);
                let marker = Circle::new()
                    .set("cx", center.x)
                    .set("cy", center.y)
                    .set("r", SYMBOL_RADIUS)
                    .set("fill", "white")
                    .set("stroke", "black")
                    .set("stroke-width", 2);
                doc = doc.add(
                    Group::new()
                        .set("data-icon", icon.as_str())
                        .add(Title::new(icon.as_str()))
                        .add(marker),
                );
            }
        }
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
