//! Single-shot timer value object

/// A single-shot timer driven by an external millisecond clock.
///
/// The timer never fires on its own: the owner asks whether it is due and
/// takes it, which deactivates it. Restarting an active timer moves its
/// deadline instead of stacking a second firing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleShotTimer {
    interval_ms: u64,
    deadline_ms: Option<u64>,
}

impl SingleShotTimer {
    /// Create an inactive timer with the given interval
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            deadline_ms: None,
        }
    }

    /// Current interval
    pub const fn interval(&self) -> u64 {
        self.interval_ms
    }

    /// Change the interval without starting or stopping the timer
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    /// Start (or restart) the timer with its current interval
    pub fn start(&mut self, now_ms: u64) {
        self.deadline_ms = Some(now_ms.saturating_add(self.interval_ms));
    }

    /// Set the interval and start (or restart) the timer
    pub fn start_with(&mut self, now_ms: u64, interval_ms: u64) {
        self.interval_ms = interval_ms;
        self.start(now_ms);
    }

    /// Stop the timer; no-op when inactive
    pub fn stop(&mut self) {
        self.deadline_ms = None;
    }

    /// Check if the timer is armed
    pub const fn is_active(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Absolute deadline, if armed
    pub const fn deadline(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Check if the timer is armed and its deadline has passed
    pub fn is_due(&self, now_ms: u64) -> bool {
        matches!(self.deadline_ms, Some(deadline) if deadline <= now_ms)
    }

    /// Time left until the deadline, if armed
    pub fn remaining(&self, now_ms: u64) -> Option<u64> {
        self.deadline_ms.map(|d| d.saturating_sub(now_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_timer_is_inactive() {
        let timer = SingleShotTimer::new(50);
        assert!(!timer.is_active());
        assert!(!timer.is_due(1_000));
        assert_eq!(timer.interval(), 50);
    }

    #[test]
    fn start_sets_deadline_from_interval() {
        let mut timer = SingleShotTimer::new(50);
        timer.start(100);
        assert_eq!(timer.deadline(), Some(150));
        assert!(!timer.is_due(149));
        assert!(timer.is_due(150));
        assert_eq!(timer.remaining(120), Some(30));
    }

    #[test]
    fn restart_moves_deadline() {
        let mut timer = SingleShotTimer::new(0);
        timer.start(10);
        timer.start(20);
        assert_eq!(timer.deadline(), Some(20));
    }

    #[test]
    fn start_with_replaces_interval() {
        let mut timer = SingleShotTimer::new(0);
        timer.start_with(10, 500);
        assert_eq!(timer.interval(), 500);
        assert_eq!(timer.deadline(), Some(510));
    }

    #[test]
    fn set_interval_keeps_state() {
        let mut timer = SingleShotTimer::new(0);
        timer.set_interval(70);
        assert!(!timer.is_active());

        timer.start(0);
        timer.set_interval(10);
        assert_eq!(timer.deadline(), Some(70));
    }

    #[test]
    fn stop_disarms() {
        let mut timer = SingleShotTimer::new(0);
        timer.start(0);
        timer.stop();
        assert!(!timer.is_active());
        assert!(timer.remaining(0).is_none());
    }
}
