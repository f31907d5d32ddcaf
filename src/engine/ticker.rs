use std::time::{Duration, Instant};

/// Fixed-cadence schedule driven by the caller's clock.
///
/// The owner asks [`due`](PollTicker::due) on every event-loop tick, passing
/// whether polling should continue. A `false` predicate disarms the ticker on
/// the spot, so nothing keeps firing once the condition is gone.
#[derive(Clone, Debug)]
pub struct PollTicker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PollTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Starts the schedule if it is not already running.
    pub fn arm(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.interval);
        }
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn due(&mut self, now: Instant, keep_running: bool) -> bool {
        if !keep_running {
            self.disarm();
            return false;
        }
        match self.next_due {
            Some(at) if now >= at => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unarmed_ticker_never_fires() {
        let mut ticker = PollTicker::new(Duration::from_millis(800));
        let t0 = Instant::now();
        assert!(!ticker.due(t0 + Duration::from_secs(5), true));
    }

    #[test]
    fn fires_once_per_interval() {
        let mut ticker = PollTicker::new(Duration::from_millis(800));
        let t0 = Instant::now();
        ticker.arm(t0);
        assert!(!ticker.due(t0 + Duration::from_millis(500), true));
        assert!(ticker.due(t0 + Duration::from_millis(800), true));
        assert!(!ticker.due(t0 + Duration::from_millis(900), true));
        assert!(ticker.due(t0 + Duration::from_millis(1600), true));
    }

    #[test]
    fn arming_twice_keeps_schedule() {
        let mut ticker = PollTicker::new(Duration::from_millis(800));
        let t0 = Instant::now();
        ticker.arm(t0);
        ticker.arm(t0 + Duration::from_millis(700));
        assert!(ticker.due(t0 + Duration::from_millis(800), true));
    }

    #[test]
    fn false_predicate_disarms() {
        let mut ticker = PollTicker::new(Duration::from_millis(800));
        let t0 = Instant::now();
        ticker.arm(t0);
        assert!(!ticker.due(t0 + Duration::from_secs(1), false));
        assert!(!ticker.is_armed());
        assert!(!ticker.due(t0 + Duration::from_secs(2), true));
    }
}
