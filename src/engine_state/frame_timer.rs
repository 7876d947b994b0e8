//! Frame pacing statistics.
//!
//! [`FrameTimer`] measures the time between presented frames and averages the
//! frame rate over one second windows for the debug log.

use web_time::{Duration, Instant};

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Counts displayed frames and reports the frame rate once per interval.
pub struct FrameTimer {
    window_start: Instant,
    last_frame: Instant,
    frames: u32,
    last_delta: Duration,
}

impl FrameTimer {
    /// Creates a timer whose first interval starts now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a timer whose first interval starts at `now`.
    pub fn starting_at(now: Instant) -> Self {
        Self {
            window_start: now,
            last_frame: now,
            frames: 0,
            last_delta: Duration::ZERO,
        }
    }

    /// Records a frame at the current time.
    pub fn tick(&mut self) -> Option<f32> {
        self.tick_at(Instant::now())
    }

    /// Records a frame presented at `now`.
    ///
    /// # Returns
    /// The average frames per second once a full interval has passed since the
    /// last report, `None` otherwise
    pub fn tick_at(&mut self, now: Instant) -> Option<f32> {
        self.last_delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < REPORT_INTERVAL {
            return None;
        }

        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.window_start = now;
        self.frames = 0;
        Some(fps)
    }

    /// Time between the last two frames.
    pub fn last_delta(&self) -> Duration {
        self.last_delta
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reports_once_per_interval() {
        let start = Instant::now();
        let mut timer = FrameTimer::starting_at(start);

        for i in 1..60 {
            let at = start + Duration::from_millis(i * 16);
            assert!(timer.tick_at(at).is_none());
        }
        assert_eq!(timer.last_delta(), Duration::from_millis(16));

        let fps = timer
            .tick_at(start + Duration::from_secs(1))
            .expect("one second elapsed");
        assert_relative_eq!(fps, 60.0);

        // The next window starts empty.
        assert!(timer
            .tick_at(start + Duration::from_millis(1016))
            .is_none());
    }
}
