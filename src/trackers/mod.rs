//! Latency and memory trackers wrapping a single tracked call.

pub mod latency;
pub mod memory;

pub use latency::{LatencyTracker, LatencyWindow, WallClockLatencyTracker, track};
pub use memory::{
    MemoryTracker, MemoryWindow, RssMemoryTracker, bytes_to_megabytes, current_rss_bytes,
    track_memory,
};
