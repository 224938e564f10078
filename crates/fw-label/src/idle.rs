//! Idle-clear timing.
//!
//! After a configurable quiet period with no renders, the label is hidden
//! again. Unlike the debouncer, this timer restarts on every render: it
//! measures time since the label last changed, so each new event buys the
//! label a full display interval.
//!
//! The timer is never armed before the first render, so a bar that has shown
//! nothing yet never "clears". With no interval configured, every method is
//! a no-op.

use tokio::time::{Duration, Instant};

/// Rearm-per-render clear timer.
#[derive(Debug)]
pub struct IdleClear {
    after: Option<Duration>,
    deadline: Option<Instant>,
}

impl IdleClear {
    /// Creates the timer; `None` disables it.
    #[must_use]
    pub const fn new(after: Option<Duration>) -> Self {
        Self {
            after,
            deadline: None,
        }
    }

    /// Restarts the quiet period, replacing any armed deadline.
    pub fn rearm(&mut self, now: Instant) {
        if let Some(after) = self.after {
            self.deadline = Some(now + after);
        }
    }

    /// Returns the armed deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` and disarms when the quiet period has elapsed.
    #[must_use]
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.deadline.is_some_and(|deadline| deadline <= now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Cancels any armed deadline.
    pub fn disarm(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AFTER: Duration = Duration::from_millis(600);

    #[test]
    fn test_unarmed_until_first_rearm() {
        let mut idle = IdleClear::new(Some(AFTER));
        assert!(idle.deadline().is_none());
        assert!(!idle.take_due(Instant::now() + AFTER * 10));
    }

    #[test]
    fn test_due_after_quiet_period() {
        let mut idle = IdleClear::new(Some(AFTER));
        let start = Instant::now();

        idle.rearm(start);
        assert!(!idle.take_due(start + AFTER / 2));
        assert!(idle.take_due(start + AFTER));

        // Disarmed once taken.
        assert!(idle.deadline().is_none());
        assert!(!idle.take_due(start + AFTER * 2));
    }

    #[test]
    fn test_rearm_replaces_deadline() {
        let mut idle = IdleClear::new(Some(AFTER));
        let start = Instant::now();

        idle.rearm(start);
        idle.rearm(start + AFTER / 2);

        assert!(!idle.take_due(start + AFTER));
        assert!(idle.take_due(start + AFTER / 2 + AFTER));
    }

    #[test]
    fn test_disabled_never_arms() {
        let mut idle = IdleClear::new(None);
        idle.rearm(Instant::now());
        assert!(idle.deadline().is_none());
        assert!(!idle.take_due(Instant::now() + AFTER));
    }

    #[test]
    fn test_disarm() {
        let mut idle = IdleClear::new(Some(AFTER));
        let start = Instant::now();
        idle.rearm(start);
        idle.disarm();
        assert!(!idle.take_due(start + AFTER * 2));
    }
}
