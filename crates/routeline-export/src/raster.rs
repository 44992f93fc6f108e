//! PNG export via tiny-skia.
//!
//! Paths are stroked with round caps and joins, polygons are filled
//! with the non-zero rule and symbols are drawn as ringed discs, all
//! anti-aliased. Coordinates are taken as pixels.

use log::trace;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use routeline_track::{Color, DrawCommand, Point};

use crate::{Canvas, ExportError, SYMBOL_RADIUS, depth_sorted, symbol_center};

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

#[allow(clippy::cast_possible_truncation)]
fn build_path(points: &[Point], close: bool) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

/// Paint `commands` onto a fresh pixmap.
///
/// # Errors
///
/// Returns [`ExportError::InvalidCanvas`] when tiny-skia cannot allocate
/// a pixmap of the requested size (for example a zero dimension).
#[allow(clippy::cast_possible_truncation)]
pub fn render(
    commands: &[DrawCommand],
    canvas: Canvas,
    background: Option<Color>,
) -> Result<Pixmap, ExportError> {
    let Some(mut pixmap) = Pixmap::new(canvas.width, canvas.height) else {
        return Err(ExportError::InvalidCanvas {
            width: canvas.width,
            height: canvas.height,
        });
    };
    if let Some(c) = background {
        pixmap.fill(tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a));
    }

    for command in depth_sorted(commands) {
        match command {
            DrawCommand::Path { points, pen, .. } => {
                let Some(path) = build_path(points, false) else {
                    trace!("skipping degenerate path of {} points", points.len());
                    continue;
                };
                let stroke = Stroke {
                    width: pen.width as f32,
                    line_cap: LineCap::Round,
                    line_join: LineJoin::Round,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint(pen.color), &stroke, Transform::identity(), None);
            }
            DrawCommand::ConvexPolygon { points, color, .. } => {
                let Some(path) = build_path(points, true) else {
                    trace!("skipping degenerate polygon of {} points", points.len());
                    continue;
                };
                pixmap.fill_path(
                    &path,
                    &paint(*color),
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
            DrawCommand::Symbol { pivot, anchor, .. } => {
                let center = symbol_center(*pivot, *anchor);
                let Some(disc) = PathBuilder::from_circle(
                    center.x as f32,
                    center.y as f32,
                    SYMBOL_RADIUS as f32,
                ) else {
                    continue;
                };
                pixmap.fill_path(
                    &disc,
                    &paint(Color::rgba(255, 255, 255, 255)),
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
                let ring = Stroke {
                    width: 2.0,
                    ..Stroke::default()
                };
                pixmap.stroke_path(
                    &disc,
                    &paint(Color::rgba(0, 0, 0, 255)),
                    &ring,
                    Transform::identity(),
                    None,
                );
            }
        }
    }

    Ok(pixmap)
}

/// Paint `commands` and encode the result as PNG.
///
/// # Errors
///
/// Returns [`ExportError::InvalidCanvas`] for an unusable canvas size and
/// [`ExportError::PngEncode`] if encoding fails.
pub fn to_png(
    commands: &[DrawCommand],
    canvas: Canvas,
    background: Option<Color>,
) -> Result<Vec<u8>, ExportError> {
    render(commands, canvas, background)?
        .encode_png()
        .map_err(|e| ExportError::PngEncode(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use routeline_track::{Anchor, Pen};

    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn canvas() -> Canvas {
        Canvas {
            width: 40,
            height: 40,
        }
    }

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> tiny_skia::PremultipliedColorU8 {
        pixmap.pixel(x, y).unwrap()
    }

    #[test]
    fn zero_canvas_is_rejected() {
        let err = to_png(&[], Canvas { width: 0, height: 10 }, None).unwrap_err();
        assert!(matches!(err, ExportError::InvalidCanvas { width: 0, height: 10 }));
    }

    #[test]
    fn png_has_signature() {
        let png = to_png(&[], canvas(), Some(Color::rgba(255, 255, 255, 255))).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn stroked_path_covers_its_pixels() {
        let commands = vec![DrawCommand::Path {
            points: vec![Point::new(0.0, 20.0), Point::new(40.0, 20.0)],
            pen: Pen {
                color: Color::rgba(0, 0, 255, 255),
                width: 6.0,
            },
            depth: 100.0,
        }];
        let pixmap = render(&commands, canvas(), None).unwrap();
        let on = pixel(&pixmap, 20, 20);
        assert_eq!((on.blue(), on.alpha()), (255, 255));
        assert_eq!(pixel(&pixmap, 20, 2).alpha(), 0);
    }

    #[test]
    fn polygon_is_filled() {
        let commands = vec![DrawCommand::ConvexPolygon {
            points: vec![
                Point::new(5.0, 5.0),
                Point::new(35.0, 5.0),
                Point::new(35.0, 35.0),
                Point::new(5.0, 35.0),
            ],
            color: Color::rgba(0, 0, 128, 255),
            depth: 200.0,
        }];
        let pixmap = render(&commands, canvas(), None).unwrap();
        let inside = pixel(&pixmap, 20, 20);
        assert_eq!((inside.red(), inside.blue(), inside.alpha()), (0, 128, 255));
    }

    #[test]
    fn later_depth_paints_over_earlier() {
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(40.0, 0.0),
            Point::new(40.0, 40.0),
            Point::new(0.0, 40.0),
        ];
        let commands = vec![
            DrawCommand::ConvexPolygon {
                points: square.clone(),
                color: Color::rgba(255, 0, 0, 255),
                depth: 200.0,
            },
            DrawCommand::ConvexPolygon {
                points: square,
                color: Color::rgba(0, 255, 0, 255),
                depth: 100.0,
            },
        ];
        let pixmap = render(&commands, canvas(), None).unwrap();
        assert_eq!(pixel(&pixmap, 20, 20).red(), 255);
    }

    #[test]
    fn symbol_draws_a_marker() {
        let commands = vec![DrawCommand::Symbol {
            pivot: Point::new(20.0, 20.0),
            icon: "route_from".to_owned(),
            anchor: Anchor::Center,
            depth: 300.0,
        }];
        let pixmap = render(&commands, canvas(), None).unwrap();
        assert_eq!(pixel(&pixmap, 20, 20).alpha(), 255);
        assert_eq!(pixel(&pixmap, 2, 2).alpha(), 0);
    }

    #[test]
    fn single_point_path_is_skipped() {
        let commands = vec![DrawCommand::Path {
            points: vec![Point::new(1.0, 1.0)],
            pen: Pen {
                color: Color::rgba(0, 0, 0, 255),
                width: 4.0,
            },
            depth: 0.0,
        }];
        let pixmap = render(&commands, canvas(), None).unwrap();
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }
}
