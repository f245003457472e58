//! Frame pacing: turns real elapsed time into discrete game steps.
//!
//! Both timers are plain accumulators. Leftover fractions of a period
//! carry into the next frame, so frame rate never changes income.

use std::time::Duration;

pub const INCOME_PERIOD: Duration = Duration::from_secs(1);

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Counts whole seconds of passive income.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomeTimer {
    elapsed: Duration,
}

impl IncomeTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one frame's delta. Returns how many whole seconds completed.
    pub fn advance(&mut self, dt: Duration) -> u64 {
        self.elapsed = self.elapsed.saturating_add(dt);
        let seconds = self.elapsed.as_secs();
        self.elapsed -= Duration::from_secs(seconds);
        seconds
    }

    pub fn leftover(&self) -> Duration {
        self.elapsed
    }
}

/// Fires once per save interval.
#[derive(Debug, Clone, PartialEq)]
pub struct AutosaveTimer {
    interval: Duration,
    elapsed:  Duration,
}

impl AutosaveTimer {
    /// A zero interval is treated as one second.
    pub fn new(interval: Duration) -> Self {
        let interval = if interval.is_zero() { INCOME_PERIOD } else { interval };
        Self { interval, elapsed: Duration::ZERO }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Add one frame's delta. Returns true if a save is due. Several
    /// intervals passing in one frame still produce a single save.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed < self.interval {
            return false;
        }
        let rest = self.elapsed.as_nanos() % self.interval.as_nanos();
        self.elapsed = Duration::new(
            (rest / NANOS_PER_SEC) as u64,
            (rest % NANOS_PER_SEC) as u32,
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_keeps_fractional_leftover() {
        let mut timer = IncomeTimer::new();
        assert_eq!(timer.advance(Duration::from_millis(700)), 0);
        assert_eq!(timer.advance(Duration::from_millis(700)), 1);
        assert_eq!(timer.leftover(), Duration::from_millis(400));
        assert_eq!(timer.advance(Duration::from_millis(2_600)), 3);
        assert_eq!(timer.leftover(), Duration::ZERO);
    }

    #[test]
    fn autosave_fires_once_per_interval() {
        let mut timer = AutosaveTimer::new(Duration::from_secs(10));
        let fired = (0..100)
            .filter(|_| timer.advance(Duration::from_millis(500)))
            .count();
        assert_eq!(fired, 5);
    }

    #[test]
    fn huge_frames_do_not_loop_per_period() {
        let mut income = IncomeTimer::new();
        assert_eq!(income.advance(Duration::from_millis(u64::MAX)), u64::MAX / 1_000);
        assert_eq!(income.leftover(), Duration::from_millis(u64::MAX % 1_000));
        assert_eq!(income.advance(Duration::from_millis(385)), 1);
        assert_eq!(income.leftover(), Duration::ZERO);

        let mut autosave = AutosaveTimer::new(Duration::from_secs(3));
        assert!(autosave.advance(Duration::from_millis(u64::MAX)));
        // 0.615 s past the last 3-second boundary.
        assert!(!autosave.advance(Duration::from_millis(2_384)));
        assert!(autosave.advance(Duration::from_millis(1)));
    }

    #[test]
    fn zero_interval_is_clamped() {
        assert_eq!(AutosaveTimer::new(Duration::ZERO).interval(), INCOME_PERIOD);
    }
}
