//! Wall-clock frame timing for realtime runs.

use std::time::{Duration, Instant};

/// Measures the delta between consecutive frames.
#[derive(Debug)]
pub(crate) struct Ticker {
    last_frame: Instant,
}

impl Ticker {
    pub(crate) fn new() -> Self {
        Self {
            last_frame: Instant::now(),
        }
    }

    /// Duration elapsed since the previous call, never negative.
    pub(crate) fn frame_delta(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn frame_delta_covers_elapsed_time() {
        let mut ticker = Ticker::new();
        thread::sleep(Duration::from_millis(5));
        assert!(ticker.frame_delta() >= Duration::from_millis(5));
    }

    #[test]
    fn consecutive_deltas_reset_the_reference_point() {
        let mut ticker = Ticker::new();
        thread::sleep(Duration::from_millis(20));
        let first = ticker.frame_delta();
        let second = ticker.frame_delta();
        assert!(second <= first);
    }
}
