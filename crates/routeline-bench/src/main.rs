//! routeline-bench: CLI tool for replaying route track scenarios.
//!
//! Loads a scenario (a route, its turns and a list of position ticks),
//! feeds every tick through a [`RouteRenderCache`] backed by an
//! in-memory recorder, and prints per-update diagnostics. Useful for:
//!
//! - Checking which ticks trigger a full rebuild vs. a closest-segment
//!   redraw
//! - Tuning arrow lengths, simplification tolerance and navigation scale
//! - Rendering the final frame to SVG or PNG for inspection
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin routeline-bench -- [OPTIONS] [SCENARIO]
//! ```
//!
//! Set `RUST_LOG=debug` to see cache decisions as they happen.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod scenario;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use log::info;
use serde::Serialize;

use routeline_export::{Canvas, SvgMetadata};
use routeline_track::diagnostics::{Clock, ReplaySummary, UpdateDiagnostics, update_with_diagnostics};
use routeline_track::render::RecorderStats;
use routeline_track::{Color, Recorder, RouteEnd, RouteRenderCache, RouteStyle};

use crate::scenario::Scenario;

/// Route track replay and diagnostics.
///
/// Replays the position ticks of a scenario through the route render
/// cache and prints what each update regenerated and how long it took.
#[derive(Parser)]
#[command(name = "routeline-bench", version)]
struct Cli {
    /// Path to a scenario JSON file.
    #[arg(required_unless_present = "demo")]
    scenario: Option<PathBuf>,

    /// Replay the built-in staircase scenario instead of a file.
    #[arg(long, conflicts_with = "scenario")]
    demo: bool,

    /// Full route style as a JSON string. Overrides the scenario's style.
    #[arg(long)]
    style_json: Option<String>,

    /// Write the final frame as SVG.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write the final frame as PNG.
    #[arg(long)]
    png: Option<PathBuf>,

    /// Canvas width in pixels for SVG/PNG output.
    #[arg(long, default_value_t = 1200, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    width: u32,

    /// Canvas height in pixels for SVG/PNG output.
    #[arg(long, default_value_t = 800, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    height: u32,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,
}

/// JSON output document.
#[derive(Serialize)]
struct Report<'a> {
    updates: &'a [UpdateDiagnostics],
    summary: ReplaySummary,
    renderer: RecorderStats,
}

fn load_scenario(cli: &Cli) -> Result<Scenario, String> {
    let Some(path) = cli.scenario.as_ref().filter(|_| !cli.demo) else {
        return Ok(scenario::demo());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("Error parsing {}: {e}", path.display()))
}

/// Pick the style: `--style-json`, then the scenario's, then defaults.
fn style_from_cli(cli: &Cli, scenario: &Scenario) -> Result<RouteStyle, String> {
    if let Some(ref json) = cli.style_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --style-json: {e}"));
    }
    Ok(scenario.style.clone().unwrap_or_default())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let scenario = match load_scenario(&cli) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    let style = match style_from_cli(&cli, &scenario) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        "scenario: {} route points, {} ticks",
        scenario.route.len(),
        scenario.ticks.len(),
    );

    let mut cache = RouteRenderCache::new(scenario.polyline(), scenario.effective_turns(), style);
    for symbol in &scenario.begin_symbols {
        cache.add_closing_symbol(RouteEnd::Begin, symbol.clone());
    }
    for symbol in &scenario.end_symbols {
        cache.add_closing_symbol(RouteEnd::End, symbol.clone());
    }

    let mut recorder = Recorder::new();
    let mut updates = Vec::with_capacity(scenario.ticks.len());
    // Last frame that still had geometry, for output.
    let mut last_scene = Vec::new();

    for (i, tick) in scenario.ticks.iter().enumerate() {
        let diagnostics = update_with_diagnostics(&mut cache, &mut recorder, &tick.event(), &StdClock);
        if !cli.json {
            println!("tick {i:>4}  {}", diagnostics.report());
        }
        if cache.has_display_lists() {
            last_scene = recorder.scene(&cache.display_lists());
        }
        updates.push(diagnostics);
    }

    let summary = ReplaySummary::from_updates(&updates);
    if cli.json {
        let report = Report {
            updates: &updates,
            summary,
            renderer: recorder.stats(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing diagnostics: {e}");
                cache.clear(&mut recorder);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!();
        println!("{}", summary.report());
        let stats = recorder.stats();
        println!(
            "Display lists: created={} deleted={} cleared={}  Draw calls: {}",
            stats.created, stats.deleted, stats.cleared, stats.draw_calls,
        );
    }

    let canvas = Canvas {
        width: cli.width,
        height: cli.height,
    };
    let background = Some(Color::rgba(255, 255, 255, 255));
    let mut status = ExitCode::SUCCESS;

    if let Some(ref svg_path) = cli.svg {
        let style_json = serde_json::to_string(cache.style()).ok();
        let metadata = SvgMetadata {
            title: Some(title_for(cli.scenario.as_deref(), cli.demo)),
            description: Some("Final frame of a routeline-bench replay"),
            style_json: style_json.as_deref(),
        };
        let svg = routeline_export::to_svg(&last_scene, canvas, background, &metadata);
        match std::fs::write(svg_path, &svg) {
            Ok(()) => eprintln!("SVG written to {} ({} bytes)", svg_path.display(), svg.len()),
            Err(e) => {
                eprintln!("Error writing SVG to {}: {e}", svg_path.display());
                status = ExitCode::FAILURE;
            }
        }
    }

    if let Some(ref png_path) = cli.png {
        match routeline_export::to_png(&last_scene, canvas, background) {
            Ok(png) => match std::fs::write(png_path, &png) {
                Ok(()) => eprintln!("PNG written to {} ({} bytes)", png_path.display(), png.len()),
                Err(e) => {
                    eprintln!("Error writing PNG to {}: {e}", png_path.display());
                    status = ExitCode::FAILURE;
                }
            },
            Err(e) => {
                eprintln!("PNG export failed: {e}");
                status = ExitCode::FAILURE;
            }
        }
    }

    cache.clear(&mut recorder);
    status
}

fn title_for(scenario: Option<&Path>, demo: bool) -> &str {
    if demo {
        return "demo";
    }
    scenario
        .and_then(Path::file_stem)
        .and_then(|s| s.to_str())
        .unwrap_or("replay")
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}
