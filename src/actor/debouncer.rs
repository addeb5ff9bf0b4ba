//! Debounce Buffer
//!
//! Pure debouncer: only handles timing. The owner polls it from its event
//! loop (`sleep(sleep_duration())` in a `select!`), so the deadline below is
//! the only scheduled work a session ever has.
//!
//! - `push` replaces the pending value and restarts the window
//! - `take_if_ready` yields the latest value once the window has elapsed
//! - `cancel` (or drop) discards the pending value for good

use std::time::Duration;

use tokio::time::Instant;

/// Default quiescence window.
pub const DEBOUNCE_MS: u64 = 100;

/// Shortest wait, even for a zero window: a value is never emitted in the
/// same turn it was pushed.
pub const MIN_WAIT: Duration = Duration::from_millis(1);

/// Idle sleep when nothing is pending.
const IDLE: Duration = Duration::from_secs(86400);

/// Delays a value until `delay` has passed without a newer one.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    /// Latest value (older ones are dropped on push)
    pending: Option<T>,
    /// When `pending` becomes ready; at most one at a time
    deadline: Option<Instant>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending value and restart the window from `now`.
    ///
    /// Returns the value that was superseded, if any.
    pub fn push(&mut self, value: T, now: Instant) -> Option<T> {
        self.deadline = Some(now + self.delay.max(MIN_WAIT));
        self.pending.replace(value)
    }

    /// Take the pending value if its window has elapsed.
    pub fn take_if_ready(&mut self, now: Instant) -> Option<T> {
        if !self.is_ready(now) {
            return None;
        }
        self.deadline = None;
        self.pending.take()
    }

    pub fn is_ready(&self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) => now >= deadline && self.pending.is_some(),
            None => false,
        }
    }

    /// Precise sleep duration until the pending value is ready.
    pub fn sleep_duration(&self, now: Instant) -> Duration {
        let Some(deadline) = self.deadline else {
            return IDLE;
        };
        deadline.saturating_duration_since(now).max(MIN_WAIT)
    }

    /// Discard the pending value; it will never be emitted.
    pub fn cancel(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_debouncer_empty() {
        let debouncer: Debouncer<u32> = Debouncer::new(ms(DEBOUNCE_MS));
        let now = Instant::now();
        assert!(debouncer.pending.is_none());
        assert!(!debouncer.is_ready(now));
        assert!(debouncer.sleep_duration(now) >= Duration::from_secs(3600));
    }

    #[test]
    fn test_burst_emits_only_last_value() {
        let mut debouncer = Debouncer::new(ms(100));
        let t0 = Instant::now();

        debouncer.push(1, t0);
        assert_eq!(debouncer.push(2, t0 + ms(40)), Some(1));
        assert_eq!(debouncer.push(3, t0 + ms(80)), Some(2));

        // Window restarts on every push: 100ms after the *last* one
        assert_eq!(debouncer.take_if_ready(t0 + ms(150)), None);
        assert_eq!(debouncer.take_if_ready(t0 + ms(179)), None);
        assert_eq!(debouncer.take_if_ready(t0 + ms(180)), Some(3));

        // Exactly once per quiescence period
        assert_eq!(debouncer.take_if_ready(t0 + ms(500)), None);
        assert!(debouncer.deadline.is_none());
    }

    #[test]
    fn test_zero_delay_never_synchronous() {
        let mut debouncer = Debouncer::new(Duration::ZERO);
        let t0 = Instant::now();

        debouncer.push("a", t0);
        assert_eq!(debouncer.take_if_ready(t0), None);
        assert_eq!(debouncer.sleep_duration(t0), MIN_WAIT);
        assert_eq!(debouncer.take_if_ready(t0 + MIN_WAIT), Some("a"));
    }

    #[test]
    fn test_cancel_discards_pending() {
        let mut debouncer = Debouncer::new(ms(100));
        let t0 = Instant::now();

        debouncer.push(1, t0);
        assert_eq!(debouncer.cancel(), Some(1));
        assert_eq!(debouncer.take_if_ready(t0 + ms(1000)), None);
        assert!(debouncer.sleep_duration(t0) >= Duration::from_secs(3600));
    }

    #[test]
    fn test_sleep_duration_after_push() {
        let mut debouncer = Debouncer::new(ms(DEBOUNCE_MS));
        let t0 = Instant::now();
        debouncer.push((), t0);

        assert_eq!(debouncer.sleep_duration(t0), ms(DEBOUNCE_MS));
        assert_eq!(debouncer.sleep_duration(t0 + ms(60)), ms(DEBOUNCE_MS - 60));
        // Overdue: still clamps to a real (non-zero) sleep
        assert_eq!(debouncer.sleep_duration(t0 + ms(500)), MIN_WAIT);
    }
}
