use std::time::Duration;

/// Fixed-timestep accumulator.
///
/// Converts variable frame deltas into a whole number of fixed-length
/// simulation steps, carrying the remainder into the next frame.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct StepClock {
    interval: Duration,
    accumulated: Duration,
}

impl StepClock {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        debug_assert!(!interval.is_zero());

        Self {
            interval,
            accumulated: Duration::ZERO,
        }
    }

    /// Adds `elapsed` and returns how many steps are now due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }

        self.accumulated += elapsed;
        let mut steps = 0;
        while self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            steps += 1;
        }
        steps
    }

    /// Drops any partially accumulated time.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }

    #[must_use]
    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::StepClock;

    #[test]
    fn fast_frames_accumulate_before_stepping() {
        let mut clock = StepClock::new(Duration::from_millis(140));

        assert_eq!(clock.advance(Duration::from_millis(16)), 0);
        assert_eq!(clock.advance(Duration::from_millis(100)), 0);
        assert_eq!(clock.advance(Duration::from_millis(30)), 1);
        assert_eq!(clock.accumulated(), Duration::from_millis(6));
    }

    #[test]
    fn lagging_frame_runs_several_steps() {
        let mut clock = StepClock::new(Duration::from_millis(140));

        assert_eq!(clock.advance(Duration::from_millis(500)), 3);
        assert_eq!(clock.accumulated(), Duration::from_millis(80));
    }

    #[test]
    fn reset_discards_remainder() {
        let mut clock = StepClock::new(Duration::from_millis(100));
        clock.advance(Duration::from_millis(90));

        clock.reset();

        assert_eq!(clock.advance(Duration::from_millis(20)), 0);
    }
}
