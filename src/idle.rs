//! Single-shot inactivity countdown.
//!
//! The timer never reads a clock itself: callers hand in `now`, which keeps
//! the debounce semantics testable and lets the event loop sleep until
//! [`IdleTimer::deadline`].

use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug, Clone)]
pub struct IdleTimer {
    timeout: Duration,
    deadline: Option<Instant>,
}

impl IdleTimer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: None,
        }
    }

    /// Cancel any pending countdown and start a fresh one.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.timeout);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once when the countdown has run out, leaving the
    /// timer disarmed until the next [`arm`](Self::arm).
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                debug!("Idle countdown expired");
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(45);

    #[test]
    fn rearming_before_timeout_never_fires() {
        let start = Instant::now();
        let mut timer = IdleTimer::new(TIMEOUT);
        timer.arm(start);
        let step = Duration::from_millis(44_900);
        let mut now = start;
        for _ in 0..200 {
            now += step;
            assert!(!timer.poll(now));
            timer.arm(now);
        }
        assert!(timer.is_armed());
    }

    #[test]
    fn full_gap_fires_exactly_once() {
        let start = Instant::now();
        let mut timer = IdleTimer::new(TIMEOUT);
        timer.arm(start);
        assert!(!timer.poll(start + Duration::from_millis(44_999)));
        assert!(timer.poll(start + TIMEOUT));
        assert!(!timer.poll(start + TIMEOUT * 2));
        assert!(!timer.is_armed());
    }

    #[test]
    fn unarmed_timer_is_dormant() {
        let mut timer = IdleTimer::new(TIMEOUT);
        assert!(!timer.poll(Instant::now() + TIMEOUT * 10));
        timer.arm(Instant::now());
        timer.cancel();
        assert!(timer.deadline().is_none());
    }
}
