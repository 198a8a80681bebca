//! Time source for cooldown bookkeeping.
//!
//! Cooldowns compare [`Instant`]s, never wall-clock time, so a clock step
//! on the host cannot shorten or extend them. Tests swap in a
//! [`ManualClock`] to drive time explicitly.

use parking_lot::Mutex;
use std::fmt;
use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

/// The process monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }

    /// Jump to `at` past the clock's origin. Never moves backwards.
    pub fn set(&self, at: Duration) {
        let mut offset = self.offset.lock();
        *offset = (*offset).max(at);
    }

    /// Time elapsed since the clock's origin.
    pub fn elapsed(&self) -> Duration {
        *self.offset.lock()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock()
    }
}

/// Store `now` in `slot` unless it already holds a later instant.
pub fn bump(slot: &mut Option<Instant>, now: Instant) {
    *slot = Some(match *slot {
        Some(prev) => prev.max(now),
        None => now,
    });
}

/// True while `last + delay` is still in the future.
///
/// A delay too large to represent as an `Instant` never expires.
pub fn cooling_down(last: Option<Instant>, delay: Duration, now: Instant) -> bool {
    match last {
        Some(last) => last.checked_add(delay).is_none_or(|end| end > now),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_moves_only_forward() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance(Duration::from_secs(10));
        assert_eq!(clock.now() - start, Duration::from_secs(10));
        clock.set(Duration::from_secs(5));
        assert_eq!(clock.elapsed(), Duration::from_secs(10));
        clock.set(Duration::from_secs(40));
        assert_eq!(clock.now() - start, Duration::from_secs(40));
    }

    #[test]
    fn bump_never_decreases() {
        let t0 = Instant::now();
        let later = t0 + Duration::from_secs(5);
        let mut slot = None;
        bump(&mut slot, later);
        bump(&mut slot, t0);
        assert_eq!(slot, Some(later));
    }

    #[test]
    fn cooldown_boundary_is_exclusive() {
        let t0 = Instant::now();
        let delay = Duration::from_secs(60);
        assert!(!cooling_down(None, delay, t0));
        assert!(cooling_down(Some(t0), delay, t0 + Duration::from_secs(59)));
        assert!(!cooling_down(Some(t0), delay, t0 + delay));
        assert!(!cooling_down(Some(t0), Duration::ZERO, t0));
    }

    #[test]
    fn unrepresentable_delay_never_expires() {
        let t0 = Instant::now();
        let much_later = t0 + Duration::from_secs(86_400 * 365);
        assert!(cooling_down(Some(t0), Duration::MAX, much_later));
        assert!(cooling_down(Some(t0), Duration::from_secs(u64::MAX), t0));
        assert!(!cooling_down(None, Duration::MAX, t0));
    }
}
