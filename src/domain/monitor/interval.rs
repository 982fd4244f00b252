//! Check-again interval policy

/// Shortest delay between consecutive buffer checks
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 50;

/// Longest delay between consecutive buffer checks
pub const DEFAULT_MAX_INTERVAL_MS: u64 = 500;

/// Failed reads tolerated before giving up until the next notification
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// What to do with the check-again timer after a check cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckAgain {
    /// Arm the timer with this interval
    Start(u64),
    /// Leave the timer idle and reset its interval
    Idle,
}

/// Timing policy shared by the check-again timer and the retry logic.
///
/// Intervals grow as `interval * 2 + min` after every cycle and are capped
/// at `max`; a cycle that reaches the cap without seeing a change lets the
/// timer go idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckPolicy {
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
    pub max_retries: u32,
}

impl CheckPolicy {
    /// Create a policy.
    ///
    /// `min` is at least 1ms so a busy cycle can never re-arm for "now",
    /// and `max` is at least `min`.
    pub fn new(min_interval_ms: u64, max_interval_ms: u64, max_retries: u32) -> Self {
        let min_interval_ms = min_interval_ms.max(1);
        Self {
            min_interval_ms,
            max_interval_ms: max_interval_ms.max(min_interval_ms),
            max_retries,
        }
    }

    /// Interval proposed for the cycle following one that ran at `current`
    pub fn next_interval(&self, current_ms: u64) -> u64 {
        current_ms
            .saturating_mul(2)
            .saturating_add(self.min_interval_ms)
    }

    /// Delay before re-reading a buffer after the `retry`-th failed read
    pub fn retry_delay(&self, retry: u32) -> u64 {
        u64::from(retry).saturating_mul(self.max_interval_ms)
    }

    /// Check whether another retry is allowed after `retry` failures
    pub fn can_retry(&self, retry: u32) -> bool {
        retry < self.max_retries
    }

    /// Decide how to re-arm the check-again timer
    pub fn schedule(&self, changed: bool, interval_ms: u64) -> CheckAgain {
        if interval_ms < self.max_interval_ms {
            CheckAgain::Start(interval_ms)
        } else if changed {
            CheckAgain::Start(self.max_interval_ms)
        } else {
            CheckAgain::Idle
        }
    }
}

impl Default for CheckPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MIN_INTERVAL_MS,
            DEFAULT_MAX_INTERVAL_MS,
            DEFAULT_MAX_RETRIES,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let policy = CheckPolicy::default();
        assert_eq!(policy.min_interval_ms, 50);
        assert_eq!(policy.max_interval_ms, 500);
        assert_eq!(policy.max_retries, 3);
    }

    #[test]
    fn max_is_clamped_to_min() {
        let policy = CheckPolicy::new(200, 100, 3);
        assert_eq!(policy.max_interval_ms, 200);
    }

    #[test]
    fn zero_min_is_raised() {
        let policy = CheckPolicy::new(0, 500, 3);
        assert_eq!(policy.min_interval_ms, 1);
        assert_eq!(policy.next_interval(0), 1);
    }

    #[test]
    fn interval_sequence_from_zero() {
        let policy = CheckPolicy::default();
        let mut interval = 0;
        let mut seen = Vec::new();
        for _ in 0..4 {
            interval = policy.next_interval(interval);
            seen.push(interval);
        }
        assert_eq!(seen, vec![50, 150, 350, 750]);
    }

    #[test]
    fn schedule_below_max_always_starts() {
        let policy = CheckPolicy::default();
        assert_eq!(policy.schedule(false, 350), CheckAgain::Start(350));
        assert_eq!(policy.schedule(true, 0), CheckAgain::Start(0));
    }

    #[test]
    fn schedule_caps_at_max_when_changed() {
        let policy = CheckPolicy::default();
        assert_eq!(policy.schedule(true, 750), CheckAgain::Start(500));
        assert_eq!(policy.schedule(true, 1_050), CheckAgain::Start(500));
    }

    #[test]
    fn schedule_goes_idle_at_max_without_change() {
        let policy = CheckPolicy::default();
        assert_eq!(policy.schedule(false, 750), CheckAgain::Idle);
        assert_eq!(policy.schedule(false, 500), CheckAgain::Idle);
    }

    #[test]
    fn retry_delays_scale_with_attempt() {
        let policy = CheckPolicy::default();
        assert_eq!(policy.retry_delay(1), 500);
        assert_eq!(policy.retry_delay(3), 1_500);
        assert!(policy.can_retry(2));
        assert!(!policy.can_retry(3));
    }
}
