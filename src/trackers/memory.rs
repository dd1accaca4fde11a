//! Scoped peak memory measurement.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

/// Smallest sampling interval, so a tiny duration budget cannot busy-loop.
const MIN_SAMPLING_INTERVAL: Duration = Duration::from_millis(1);

/// Samples memory while a window is open and keeps the maximum.
pub trait MemoryTracker {
    /// Opens a window sampling every `interval`.
    fn start(&mut self, interval: Duration);

    /// Closes the open window and commits its peak. A no-op when no window is open.
    fn stop(&mut self);

    /// Maximum memory observed across closed windows, in megabytes.
    fn peak_memory_mb(&self) -> u64;
}

pub fn bytes_to_megabytes(bytes: u64) -> u64 {
    bytes / 1_000_000
}

/// Resident set size of the current process, in bytes.
#[cfg(target_os = "linux")]
pub fn current_rss_bytes() -> u64 {
    std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|status| {
            status
                .lines()
                .find(|line| line.starts_with("VmRSS:"))
                .and_then(|line| {
                    line.trim_start_matches("VmRSS:")
                        .trim()
                        .trim_end_matches("kB")
                        .trim()
                        .parse::<u64>()
                        .ok()
                })
                .map(|kb| kb * 1024)
        })
        .unwrap_or(0)
}

#[cfg(not(target_os = "linux"))]
pub fn current_rss_bytes() -> u64 {
    0
}

struct Sampler {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Polls the process resident set size from a background thread.
pub struct RssMemoryTracker {
    peak_bytes: Arc<AtomicU64>,
    sampler: Option<Sampler>,
}

impl RssMemoryTracker {
    pub fn new() -> Self {
        Self {
            peak_bytes: Arc::new(AtomicU64::new(0)),
            sampler: None,
        }
    }
}

impl Default for RssMemoryTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTracker for RssMemoryTracker {
    fn start(&mut self, interval: Duration) {
        self.stop();
        let interval = interval.max(MIN_SAMPLING_INTERVAL);
        debug!("Sampling resident memory every {:?}", interval);

        self.peak_bytes.fetch_max(current_rss_bytes(), Ordering::Relaxed);
        let running = Arc::new(AtomicBool::new(true));
        let handle = {
            let running = Arc::clone(&running);
            let peak_bytes = Arc::clone(&self.peak_bytes);
            thread::spawn(move || {
                while running.load(Ordering::Relaxed) {
                    peak_bytes.fetch_max(current_rss_bytes(), Ordering::Relaxed);
                    thread::sleep(interval);
                }
            })
        };
        self.sampler = Some(Sampler { running, handle });
    }

    fn stop(&mut self) {
        let Some(sampler) = self.sampler.take() else {
            return;
        };
        sampler.running.store(false, Ordering::Relaxed);
        if sampler.handle.join().is_err() {
            warn!("Memory sampling thread panicked");
        }
        self.peak_bytes.fetch_max(current_rss_bytes(), Ordering::Relaxed);
    }

    fn peak_memory_mb(&self) -> u64 {
        bytes_to_megabytes(self.peak_bytes.load(Ordering::Relaxed))
    }
}

impl Drop for RssMemoryTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// An open memory window, closed when dropped.
pub struct MemoryWindow<'a> {
    tracker: &'a mut dyn MemoryTracker,
}

impl Drop for MemoryWindow<'_> {
    fn drop(&mut self) {
        self.tracker.stop();
    }
}

pub fn track_memory(tracker: &mut dyn MemoryTracker, interval: Duration) -> MemoryWindow<'_> {
    tracker.start(interval);
    MemoryWindow { tracker }
}
