//! Integration test: drive a route track through a few position updates
//! and export the recorded scene to SVG and PNG.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use routeline_export::{Canvas, SvgMetadata, to_png, to_svg};
use routeline_track::{
    AffineTransform, Anchor, ClosingSymbol, MatchedPosition, Point, Polyline, Recorder,
    RouteEnd, RouteRenderCache, RouteStyle, Turn, UpdateEvent, UpdateOutcome,
};

fn zigzag() -> (Polyline, Vec<Turn>) {
    let points = vec![
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(100.0, 100.0),
        Point::new(200.0, 100.0),
        Point::new(200.0, 200.0),
    ];
    let turns = (1..4)
        .map(|i| Turn {
            route_index: i,
            points: points[i - 1..=i + 1].to_vec(),
            turn_index: 1,
        })
        .collect();
    (Polyline::new(points), turns)
}

#[test]
fn replayed_track_exports_to_svg_and_png() {
    let (route, turns) = zigzag();
    let mut cache = RouteRenderCache::new(route, turns, RouteStyle::default());
    cache.add_closing_symbol(
        RouteEnd::End,
        ClosingSymbol {
            icon: "route_to".to_owned(),
            anchor: Anchor::Center,
            depth: 300.0,
        },
    );
    let mut renderer = Recorder::new();
    // Shift everything into a 240x240 canvas with a 20px margin.
    let transform = AffineTransform::translate(20.0, 20.0);

    let ticks = [(0, 10.0, 0.0), (0, 40.0, 0.0), (1, 100.0, 20.0)];
    let outcomes: Vec<_> = ticks
        .iter()
        .map(|&(index, x, y)| {
            let matched = MatchedPosition::matched(index, Point::new(x, y));
            cache.update(&mut renderer, &UpdateEvent::new(matched, 16, transform))
        })
        .collect();
    assert!(matches!(outcomes[0], UpdateOutcome::FullRebuild { .. }));
    assert_eq!(outcomes[1], UpdateOutcome::ClosestSegment);
    assert!(matches!(outcomes[2], UpdateOutcome::FullRebuild { .. }));

    let scene = renderer.scene(&cache.display_lists());
    assert!(!scene.is_empty());

    let canvas = Canvas {
        width: 240,
        height: 240,
    };
    let svg = to_svg(
        &scene,
        canvas,
        None,
        &SvgMetadata {
            title: Some("zigzag"),
            ..SvgMetadata::default()
        },
    );
    assert!(svg.contains("<svg"));
    assert!(svg.contains("<path"));
    assert!(svg.contains(r#"data-icon="route_to""#));
    assert!(svg.contains("</svg>"));
    // The closest segment starts at the last matched position.
    assert!(svg.contains("M120,40"));

    let png = to_png(&scene, canvas, None).expect("scene should rasterise");
    assert!(png.len() > 8);

    cache.clear(&mut renderer);
    assert_eq!(renderer.live_count(), 0);
}
