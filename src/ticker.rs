// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct Ticker {
    period: Duration,
    next: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    pub fn fire(&mut self, now: Instant) -> bool {
        let Some(next) = self.next else {
            return false;
        };
        if now < next {
            return false;
        }
        // missed periods are dropped, not replayed
        let mut following = next + self.period;
        if following <= now {
            following = now + self.period;
        }
        self.next = Some(following);
        true
    }

    pub fn time_until(&self, now: Instant) -> Option<Duration> {
        self.next.map(|n| n.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disarmed_ticker_never_fires() {
        let mut t = Ticker::new(Duration::from_millis(15));
        let now = Instant::now();
        assert!(!t.fire(now + Duration::from_secs(5)));
        assert_eq!(t.time_until(now), None);
    }

    #[test]
    fn fires_once_per_period() {
        let mut t = Ticker::new(Duration::from_millis(15));
        let t0 = Instant::now();
        t.start(t0);
        assert!(!t.fire(t0 + Duration::from_millis(14)));
        assert!(t.fire(t0 + Duration::from_millis(15)));
        assert!(!t.fire(t0 + Duration::from_millis(16)));
        assert!(t.fire(t0 + Duration::from_millis(30)));
    }

    #[test]
    fn backlog_is_dropped() {
        let mut t = Ticker::new(Duration::from_millis(15));
        let t0 = Instant::now();
        t.start(t0);
        let late = t0 + Duration::from_millis(100);
        assert!(t.fire(late));
        assert!(!t.fire(late));
        assert_eq!(t.time_until(late), Some(Duration::from_millis(15)));
    }

    #[test]
    fn stop_disarms() {
        let mut t = Ticker::new(Duration::from_millis(200));
        let t0 = Instant::now();
        t.start(t0);
        assert!(t.is_armed());
        t.stop();
        assert!(!t.is_armed());
        assert!(!t.fire(t0 + Duration::from_secs(1)));
    }
}
