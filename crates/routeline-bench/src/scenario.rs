//! Replay scenarios: a route, its turns, and a list of position ticks.

use serde::{Deserialize, Serialize};

use routeline_track::{
    AffineTransform, Anchor, ClosingSymbol, MatchedPosition, Point, Polyline, RouteStyle, Turn,
    UpdateEvent,
};

/// A route plus the position updates to replay against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Route vertices in route space.
    pub route: Vec<Point>,
    /// Turn geometry. When empty, a turn is derived at every interior
    /// route vertex.
    #[serde(default)]
    pub turns: Vec<Turn>,
    #[serde(default)]
    pub begin_symbols: Vec<ClosingSymbol>,
    #[serde(default)]
    pub end_symbols: Vec<ClosingSymbol>,
    /// Style override; defaults apply when absent.
    #[serde(default)]
    pub style: Option<RouteStyle>,
    pub ticks: Vec<Tick>,
}

/// One position/view update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tick {
    #[serde(default = "default_true")]
    pub is_matched: bool,
    pub route_index: usize,
    pub position: Point,
    pub draw_scale: i32,
    #[serde(default)]
    pub scale_changed: bool,
    #[serde(default = "default_visual_scale")]
    pub visual_scale: f64,
    /// `[a, b, xoff, d, e, yoff]`: `x' = a*x + b*y + xoff`,
    /// `y' = d*x + e*y + yoff`.
    #[serde(default = "identity")]
    pub transform: [f64; 6],
}

const fn default_true() -> bool {
    true
}

const fn default_visual_scale() -> f64 {
    1.0
}

const fn identity() -> [f64; 6] {
    [1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
}

impl Tick {
    /// The cache event for this tick.
    pub fn event(&self) -> UpdateEvent {
        let matched = if self.is_matched {
            MatchedPosition::matched(self.route_index, self.position)
        } else {
            MatchedPosition {
                is_matched: false,
                route_index: self.route_index,
                position: self.position,
            }
        };
        let [a, b, xoff, d, e, yoff] = self.transform;
        UpdateEvent::new(
            matched,
            self.draw_scale,
            AffineTransform::new(a, b, xoff, d, e, yoff),
        )
        .with_scale_changed(self.scale_changed)
        .with_visual_scale(self.visual_scale)
    }
}

impl Scenario {
    /// Turn geometry to use: the explicit turns, or one derived per
    /// interior vertex when none are given.
    pub fn effective_turns(&self) -> Vec<Turn> {
        if self.turns.is_empty() {
            turns_at_every_vertex(&self.route)
        } else {
            self.turns.clone()
        }
    }

    pub fn polyline(&self) -> Polyline {
        Polyline::new(self.route.clone())
    }
}

/// A turn at each interior vertex, using the whole route as its
/// geometry.
pub fn turns_at_every_vertex(route: &[Point]) -> Vec<Turn> {
    (1..route.len().saturating_sub(1))
        .map(|i| Turn {
            route_index: i,
            points: route.to_vec(),
            turn_index: i,
        })
        .collect()
}

/// A built-in staircase route walked from start to finish at a
/// navigation zoom level, with one zoom change halfway.
pub fn demo() -> Scenario {
    let steps: u32 = 6;
    let route: Vec<Point> = (0..=steps * 2)
        .map(|i| {
            let x = f64::from((i + 1) / 2) * 100.0;
            let y = f64::from(i / 2) * 80.0;
            Point::new(x, y)
        })
        .collect();

    // Four ticks per segment, the last one a repeat of the third.
    let halfway = route.len() / 2;
    let mut ticks = Vec::new();
    for index in 0..route.len() - 1 {
        let a = route[index];
        let b = route[index + 1];
        for (k, t) in [0.25, 0.5, 0.75, 0.75].into_iter().enumerate() {
            ticks.push(Tick {
                is_matched: true,
                route_index: index,
                position: a + (b - a) * t,
                draw_scale: 16,
                scale_changed: index == halfway && k == 0,
                visual_scale: 1.0,
                transform: [0.8, 0.0, 40.0, 0.0, 0.8, 40.0],
            });
        }
    }

    Scenario {
        turns: turns_at_every_vertex(&route),
        route,
        begin_symbols: vec![ClosingSymbol {
            icon: "route_from".to_owned(),
            anchor: Anchor::Center,
            depth: 300.0,
        }],
        end_symbols: vec![ClosingSymbol {
            icon: "route_to".to_owned(),
            anchor: Anchor::Bottom,
            depth: 300.0,
        }],
        style: None,
        ticks,
    }
}
