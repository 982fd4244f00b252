//! Monitor domain module
//!
//! Pure state for the clipboard monitor: trackers, timers and the
//! check-again interval policy. Nothing here touches the OS.

mod interval;
mod timer;
mod tracker;

pub use interval::{
    CheckAgain, CheckPolicy, DEFAULT_MAX_INTERVAL_MS, DEFAULT_MAX_RETRIES, DEFAULT_MIN_INTERVAL_MS,
};
pub use timer::SingleShotTimer;
pub use tracker::BufferTracker;
