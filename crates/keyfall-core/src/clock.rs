use keyfall_ports::types::Seconds;
use std::time::Instant;

/// Wall-clock time since playback started. There is no pause: stopping
/// drops the anchor, and playing again needs a fresh `start`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaybackClock {
    anchor: Option<Instant>,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self { anchor: None }
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, anchor: Instant) {
        self.anchor = Some(anchor);
    }

    pub fn stop(&mut self) {
        self.anchor = None;
    }

    pub fn is_running(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn elapsed(&self) -> Option<Seconds> {
        self.elapsed_at(Instant::now())
    }

    /// `None` once stopped. Never negative, even if `now` precedes the anchor.
    pub fn elapsed_at(&self, now: Instant) -> Option<Seconds> {
        self.anchor
            .map(|anchor| now.saturating_duration_since(anchor).as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn elapsed_is_measured_from_the_anchor() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new();
        assert_eq!(clock.elapsed_at(t0), None);

        clock.start_at(t0);
        assert_eq!(clock.elapsed_at(t0), Some(0.0));
        assert_eq!(clock.elapsed_at(t0 + Duration::from_millis(1500)), Some(1.5));
    }

    #[test]
    fn stop_discards_timing_and_restart_reanchors() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new();
        clock.start_at(t0);
        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed_at(t0 + Duration::from_secs(3)), None);

        clock.start_at(t0 + Duration::from_secs(10));
        assert_eq!(clock.elapsed_at(t0 + Duration::from_secs(11)), Some(1.0));
    }

    #[test]
    fn elapsed_is_non_decreasing() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new();
        clock.start_at(t0);

        let mut last = 0.0;
        for ms in [0u64, 16, 17, 40, 40, 1000, 1016] {
            let elapsed = clock
                .elapsed_at(t0 + Duration::from_millis(ms))
                .unwrap_or_default();
            assert!(elapsed >= last);
            last = elapsed;
        }
    }
}
