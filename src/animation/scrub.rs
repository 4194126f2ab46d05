use std::time::Duration;

use crate::animation::ease::Ease;

/// Smooths the coupling between scroll-derived target time and playhead.
///
/// Every retarget starts a fresh catch-up from the current playhead that
/// lasts `lag` seconds. A zero lag snaps.
#[derive(Clone, Debug)]
pub struct ScrubFollower {
    lag: f64,
    current: f64,
    from: f64,
    target: f64,
    started_at: Duration,
}

impl ScrubFollower {
    /// Follower at time zero. Negative lags count as zero.
    pub fn new(lag: f64) -> Self {
        Self {
            lag: lag.max(0.0),
            current: 0.0,
            from: 0.0,
            target: 0.0,
            started_at: Duration::ZERO,
        }
    }

    /// Playhead as of the last step.
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Whether the playhead has reached the target.
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Aim at `target`, easing from wherever the playhead is now.
    pub fn retarget(&mut self, target: f64, now: Duration) {
        self.from = self.current;
        self.target = target;
        self.started_at = now;
        if self.lag == 0.0 {
            self.current = target;
        }
    }

    /// Jump without easing, e.g. after a rebuild.
    pub fn reset(&mut self, time: f64) {
        self.current = time;
        self.from = time;
        self.target = time;
    }

    /// Advance to `now` and return the new playhead.
    pub fn step(&mut self, now: Duration) -> f64 {
        if self.is_settled() {
            return self.current;
        }
        let elapsed = now.saturating_sub(self.started_at).as_secs_f64();
        let t = if self.lag == 0.0 {
            1.0
        } else {
            elapsed / self.lag
        };
        self.current = if t >= 1.0 {
            self.target
        } else {
            self.from + (self.target - self.from) * Ease::OutCubic.apply(t)
        };
        self.current
    }
}
