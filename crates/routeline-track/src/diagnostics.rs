//! Update diagnostics: timing and counts for each cache update.
//!
//! The core has no clock of its own. Callers that want timings pass a
//! [`Clock`] to [`update_with_diagnostics`]; the bench uses one backed
//! by `std::time::Instant`.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::{RouteRenderCache, UpdateEvent, UpdateOutcome};
use crate::render::Renderer;

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of monotonic timestamps.
pub trait Clock {
    /// Opaque timestamp.
    type Instant;

    /// Current timestamp.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Diagnostics for one [`RouteRenderCache::update`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDiagnostics {
    /// What the update regenerated.
    pub outcome: UpdateOutcome,
    /// Wall-clock duration of the update (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Points in the simplified remaining route, when it was rebuilt.
    pub route_points: Option<usize>,
    /// Arrows drawn, when the route was rebuilt.
    pub arrows: Option<usize>,
}

impl UpdateDiagnostics {
    /// One-line human-readable summary.
    #[must_use]
    pub fn report(&self) -> String {
        let ms = duration_ms(self.duration);
        match self.outcome {
            UpdateOutcome::Unchanged => format!("{:<16} {ms:>8.3}ms", "unchanged"),
            UpdateOutcome::ClosestSegment => format!("{:<16} {ms:>8.3}ms", "closest segment"),
            UpdateOutcome::FullRebuild {
                arrows,
                route_points,
            } => format!(
                "{:<16} {ms:>8.3}ms  points={route_points} arrows={arrows}",
                "full rebuild"
            ),
            UpdateOutcome::Discarded => format!("{:<16} {ms:>8.3}ms", "discarded"),
        }
    }
}

/// Run [`RouteRenderCache::update`] and time it with `clock`.
pub fn update_with_diagnostics<R, C>(
    cache: &mut RouteRenderCache,
    renderer: &mut R,
    event: &UpdateEvent,
    clock: &C,
) -> UpdateDiagnostics
where
    R: Renderer + ?Sized,
    C: Clock,
{
    let start = clock.now();
    let outcome = cache.update(renderer, event);
    let duration = clock.elapsed(&start);

    let (route_points, arrows) = match outcome {
        UpdateOutcome::FullRebuild {
            arrows,
            route_points,
        } => (Some(route_points), Some(arrows)),
        _ => (None, None),
    };

    UpdateDiagnostics {
        outcome,
        duration,
        route_points,
        arrows,
    }
}

/// Aggregate over a replay of many updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub updates: usize,
    pub unchanged: usize,
    pub closest_segment: usize,
    pub full_rebuilds: usize,
    pub discarded: usize,
    /// Sum of all update durations (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Slowest single update (seconds).
    #[serde(with = "duration_serde")]
    pub max_duration: Duration,
}

impl ReplaySummary {
    /// Tally `diagnostics`.
    #[must_use]
    pub fn from_updates(diagnostics: &[UpdateDiagnostics]) -> Self {
        let mut summary = Self::default();
        for diag in diagnostics {
            summary.updates += 1;
            match diag.outcome {
                UpdateOutcome::Unchanged => summary.unchanged += 1,
                UpdateOutcome::ClosestSegment => summary.closest_segment += 1,
                UpdateOutcome::FullRebuild { .. } => summary.full_rebuilds += 1,
                UpdateOutcome::Discarded => summary.discarded += 1,
            }
            summary.total_duration += diag.duration;
            summary.max_duration = summary.max_duration.max(diag.duration);
        }
        summary
    }

    /// Format the summary as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("Replay Summary ({} updates)\n{}", self.updates, "=".repeat(60)));
        lines.push(format!(
            "{:<16} {:>6}\n{:<16} {:>6}\n{:<16} {:>6}\n{:<16} {:>6}",
            "unchanged",
            self.unchanged,
            "closest segment",
            self.closest_segment,
            "full rebuild",
            self.full_rebuilds,
            "discarded",
            self.discarded,
        ));
        lines.push("-".repeat(60));

        #[allow(clippy::cast_precision_loss)]
        let mean_ms = if self.updates > 0 {
            duration_ms(self.total_duration) / self.updates as f64
        } else {
            0.0
        };
        lines.push(format!(
            "Total: {:.3}ms  Mean: {mean_ms:.3}ms  Max: {:.3}ms",
            duration_ms(self.total_duration),
            duration_ms(self.max_duration),
        ));
        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
