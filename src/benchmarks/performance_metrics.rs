//! Measurement loops and metric derivation.
//!
//! Metrics are pure functions of the recorded samples so they can never go
//! stale relative to the samples they summarize.

use log::debug;

use super::benchmark_errors::BenchmarkResult;
use crate::errors::BackendResult;
use crate::trackers::{LatencyTracker, track};

/// Rounds to three significant decimal digits.
///
/// Zero and non-finite values are returned unchanged.
pub fn significant_figures(x: f64) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    format!("{:.2e}", x).parse().unwrap_or(x)
}

pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Mean latency rounded to three significant figures.
pub fn average_latency(latencies: &[f64]) -> Option<f64> {
    mean(latencies).map(significant_figures)
}

/// `units` processed per second at `latency`, rounded to three significant figures.
pub fn throughput(units: f64, latency: f64) -> f64 {
    significant_figures(units / latency)
}

/// Runs `call` inside latency windows until the recorded latencies add up to
/// at least `duration` seconds. At least one call is always tracked.
///
/// A failing call still closes its window before the error is returned.
pub fn track_until_duration<F>(
    tracker: &mut dyn LatencyTracker,
    duration: f64,
    mut call: F,
) -> BenchmarkResult<Vec<f64>>
where
    F: FnMut() -> BackendResult<()>,
{
    loop {
        {
            let _window = track(tracker);
            call()?;
        }
        let elapsed: f64 = tracker.latencies().iter().sum();
        if elapsed >= duration {
            break;
        }
    }
    debug!(
        "Tracked {} calls over {:.3} s",
        tracker.latencies().len(),
        tracker.latencies().iter().sum::<f64>()
    );
    Ok(tracker.latencies().to_vec())
}
