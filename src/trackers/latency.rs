//! Scoped latency measurement.

use std::time::Instant;

/// Records the elapsed time of tracked windows, in seconds.
///
/// Backends that execute asynchronously supply their own implementation so
/// that `stop` only returns once queued work has completed.
pub trait LatencyTracker {
    /// Opens a window.
    fn start(&mut self);

    /// Closes the open window and appends its elapsed time. A no-op when no
    /// window is open.
    fn stop(&mut self);

    /// Every sample recorded so far, in order.
    fn latencies(&self) -> &[f64];
}

/// Host wall-clock tracker.
#[derive(Debug, Default)]
pub struct WallClockLatencyTracker {
    started_at: Option<Instant>,
    latencies: Vec<f64>,
}

impl WallClockLatencyTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LatencyTracker for WallClockLatencyTracker {
    fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    fn stop(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            self.latencies.push(started_at.elapsed().as_secs_f64());
        }
    }

    fn latencies(&self) -> &[f64] {
        &self.latencies
    }
}

/// An open latency window. The sample is committed when the window is
/// dropped, including on early return and unwinding.
pub struct LatencyWindow<'a> {
    tracker: &'a mut dyn LatencyTracker,
}

impl Drop for LatencyWindow<'_> {
    fn drop(&mut self) {
        self.tracker.stop();
    }
}

/// Opens a window on `tracker` that closes when the returned guard is dropped.
pub fn track(tracker: &mut dyn LatencyTracker) -> LatencyWindow<'_> {
    tracker.start();
    LatencyWindow { tracker }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn window_commits_on_drop() {
        let mut tracker = WallClockLatencyTracker::new();
        {
            let _window = track(&mut tracker);
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(tracker.latencies().len(), 1);
        assert!(tracker.latencies()[0] >= 0.005);
    }

    #[test]
    fn window_commits_on_error_path() {
        fn failing(tracker: &mut dyn LatencyTracker) -> Result<(), String> {
            let _window = track(tracker);
            Err("forward failed".to_string())
        }

        let mut tracker = WallClockLatencyTracker::new();
        assert!(failing(&mut tracker).is_err());
        assert_eq!(tracker.latencies().len(), 1);
    }

    #[test]
    fn stop_without_start_records_nothing() {
        let mut tracker = WallClockLatencyTracker::new();
        tracker.stop();
        assert!(tracker.latencies().is_empty());
    }
}
