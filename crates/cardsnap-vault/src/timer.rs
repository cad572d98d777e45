//! Idle-time bookkeeping for auto-lock
//!
//! The timer only tracks the last recognized activity timestamp and
//! answers whether the configured idle budget is spent. The decision to
//! lock, and the two independent checks that consult it (the 5-second
//! poll and the foreground-return check), live in the controller.

/// Tracks the last-activity timestamp for auto-lock decisions
#[derive(Debug, Clone)]
pub struct LockTimer {
    last_activity_ms: u64,
}

impl LockTimer {
    /// Create a timer with activity recorded at `now_ms`
    pub fn new(now_ms: u64) -> Self {
        Self {
            last_activity_ms: now_ms,
        }
    }

    /// Record a user-interaction signal
    pub fn record_activity(&mut self, now_ms: u64) {
        self.last_activity_ms = now_ms;
    }

    /// Milliseconds since the last recorded activity
    pub fn idle_elapsed(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_activity_ms)
    }

    /// Whether the idle budget has been exceeded
    pub fn is_expired(&self, now_ms: u64, timeout_ms: u64) -> bool {
        self.idle_elapsed(now_ms) > timeout_ms
    }

    /// Last recorded activity timestamp
    pub fn last_activity_ms(&self) -> u64 {
        self.last_activity_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_timer_not_expired() {
        let timer = LockTimer::new(10_000);
        assert!(!timer.is_expired(10_000, 60_000));
        assert_eq!(timer.idle_elapsed(15_000), 5_000);
    }

    #[test]
    fn test_expiry_is_strictly_greater() {
        let timer = LockTimer::new(0);
        assert!(!timer.is_expired(60_000, 60_000));
        assert!(timer.is_expired(60_001, 60_000));
    }

    #[test]
    fn test_activity_resets_idle_clock() {
        let mut timer = LockTimer::new(0);
        timer.record_activity(59_000);
        assert!(!timer.is_expired(61_000, 60_000));
        assert!(timer.is_expired(119_001, 60_000));
    }

    #[test]
    fn test_clock_regression_is_not_idle() {
        let timer = LockTimer::new(50_000);
        // A clock that moved backwards must not register idle time
        assert_eq!(timer.idle_elapsed(40_000), 0);
    }
}
