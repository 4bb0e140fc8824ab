use std::time::{Duration, Instant};

/// Per-frame delta timer.
///
/// The previous-frame timestamp is unset until [`FrameClock::start`] is
/// called at loop entry; a tick before that reports a zero delta and starts
/// the clock instead of measuring from an arbitrary point.
#[derive(Debug, Clone)]
pub struct FrameClock {
    started: Option<Instant>,
    last_frame: Option<Instant>,
    max_delta: f32,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl FrameClock {
    /// `max_delta` caps a single frame's delta in seconds, so a stall does
    /// not fling the camera.
    pub fn new(max_delta: f32) -> Self {
        Self {
            started: None,
            last_frame: None,
            max_delta,
            frame_count: 0,
        }
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        self.started = Some(now);
        self.last_frame = Some(now);
        self.frame_count = 0;
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let Some(last) = self.last_frame else {
            self.start_at(now);
            return 0.0;
        };
        self.last_frame = Some(now);
        self.frame_count += 1;
        now.saturating_duration_since(last)
            .as_secs_f32()
            .min(self.max_delta)
    }

    /// Time since the clock was started, zero before that.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.started
            .map(|s| now.saturating_duration_since(s))
            .unwrap_or_default()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_without_start_is_zero() {
        let mut clock = FrameClock::default();
        let now = Instant::now();
        assert_eq!(clock.tick_at(now), 0.0);
        assert_eq!(clock.frame_count(), 0);
        // The zero-delta tick started the clock; the next one measures from it.
        let dt = clock.tick_at(now + Duration::from_millis(20));
        assert!((dt - 0.020).abs() < 1e-6);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn measures_from_loop_entry() {
        let mut clock = FrameClock::default();
        let t0 = Instant::now();
        clock.start_at(t0);
        let dt = clock.tick_at(t0 + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-6);
        let dt = clock.tick_at(t0 + Duration::from_millis(48));
        assert!((dt - 0.032).abs() < 1e-6);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut clock = FrameClock::new(0.1);
        let t0 = Instant::now();
        clock.start_at(t0);
        assert_eq!(clock.tick_at(t0 + Duration::from_secs(3)), 0.1);
    }

    #[test]
    fn elapsed_counts_from_start() {
        let mut clock = FrameClock::default();
        let t0 = Instant::now();
        assert_eq!(clock.elapsed_at(t0), Duration::ZERO);
        clock.start_at(t0);
        clock.tick_at(t0 + Duration::from_secs(1));
        assert_eq!(clock.elapsed_at(t0 + Duration::from_secs(2)), Duration::from_secs(2));
    }
}
