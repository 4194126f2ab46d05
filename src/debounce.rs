use std::time::Duration;

/// Cancel-and-reschedule timer driven by a host clock.
#[derive(Clone, Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Duration>,
}

impl Debouncer {
    /// Idle debouncer firing `delay` after the last trigger.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Drop any pending deadline and schedule a new one at `now + delay`.
    pub fn trigger(&mut self, now: Duration) {
        self.deadline = Some(now + self.delay);
    }

    /// Forget the pending deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` exactly once when the pending deadline has passed.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
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

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn fires_once_after_delay() {
        let mut d = Debouncer::new(ms(200));
        d.trigger(ms(0));
        assert!(!d.poll(ms(199)));
        assert!(d.poll(ms(200)));
        assert!(!d.poll(ms(400)));
    }

    #[test]
    fn retrigger_coalesces() {
        let mut d = Debouncer::new(ms(200));
        d.trigger(ms(0));
        d.trigger(ms(150));
        d.trigger(ms(300));
        assert!(!d.poll(ms(450)));
        assert!(d.poll(ms(500)));
    }

    #[test]
    fn cancel_drops_pending() {
        let mut d = Debouncer::new(ms(200));
        d.trigger(ms(0));
        d.cancel();
        assert!(!d.poll(ms(1000)));
    }
}
