//! Clock port interface

/// Port for a monotonic millisecond clock.
///
/// All monitor timers are deadlines on this clock, which lets tests drive
/// the state machine without sleeping.
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since an arbitrary fixed origin
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now_ms(&self) -> u64 {
        self.as_ref().now_ms()
    }
}
