//! Deadline timers driven by the UI loop
//!
//! Timers never run on their own thread. The owner passes the current
//! `Instant` on every tick, which keeps them deterministic under test and
//! guarantees that a cancelled timer can never fire into a stale form.

use std::time::{Duration, Instant};

/// One-shot timer owned by a single form instance
#[derive(Debug, Clone, Default)]
pub struct ScopedTimer {
    deadline: Option<Instant>,
}

impl ScopedTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) the timer to fire `delay` after `now`
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Time left before the timer fires, if armed
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Returns true exactly once, on the first tick at or past the deadline
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Free-running repeating timer
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period: Duration,
    next_due: Instant,
}

impl IntervalTimer {
    pub fn new(now: Instant, period: Duration) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    /// Returns true when a period has elapsed. A stalled loop fires once and
    /// reschedules from `now` instead of replaying every missed period.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        if self.period.is_zero() || now < self.next_due {
            return false;
        }
        self.next_due += self.period;
        if self.next_due <= now {
            self.next_due = now + self.period;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_timer_fires_once() {
        let start = Instant::now();
        let mut timer = ScopedTimer::new();
        timer.arm(start, Duration::from_millis(3000));

        assert!(!timer.fire_if_due(start + Duration::from_millis(2999)));
        assert!(timer.fire_if_due(start + Duration::from_millis(3000)));
        assert!(!timer.fire_if_due(start + Duration::from_millis(5000)));
        assert_eq!(timer.remaining(start + Duration::from_millis(5000)), None);
    }

    #[test]
    fn test_scoped_timer_cancel() {
        let start = Instant::now();
        let mut timer = ScopedTimer::new();
        timer.arm(start, Duration::from_millis(10));
        timer.cancel();
        assert!(!timer.fire_if_due(start + Duration::from_secs(1)));
        assert_eq!(timer.remaining(start), None);
    }

    #[test]
    fn test_interval_timer_skips_missed_periods() {
        let start = Instant::now();
        let mut timer = IntervalTimer::new(start, Duration::from_millis(4000));

        assert!(!timer.fire_if_due(start + Duration::from_millis(3999)));
        assert!(timer.fire_if_due(start + Duration::from_millis(4000)));
        assert!(!timer.fire_if_due(start + Duration::from_millis(7999)));
        assert!(timer.fire_if_due(start + Duration::from_millis(8000)));

        // Stall for several periods: only one advance
        assert!(timer.fire_if_due(start + Duration::from_millis(30_000)));
        assert!(!timer.fire_if_due(start + Duration::from_millis(30_001)));
        assert!(timer.fire_if_due(start + Duration::from_millis(34_000)));
    }

    #[test]
    fn test_interval_timer_zero_period_never_fires() {
        let start = Instant::now();
        let mut timer = IntervalTimer::new(start, Duration::ZERO);
        assert!(!timer.fire_if_due(start + Duration::from_secs(10)));
    }
}
