//! Running frames-per-second estimate.

use std::time::Instant;

/// Estimates capture rate as frames elapsed over wall-clock time since
/// the first frame of the session.
#[derive(Debug, Clone, Default)]
pub struct FpsEstimator {
    start_time: Option<Instant>,
    frames_elapsed: u64,
    estimate: Option<f64>,
}

impl FpsEstimator {
    /// Create an estimator with no frames recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame observed at `now`.
    ///
    /// The first frame only anchors the start time; every later frame
    /// updates the estimate from the frames counted before it.
    pub fn record_frame(&mut self, now: Instant) {
        match self.start_time {
            None => self.start_time = Some(now),
            Some(start) => {
                let secs = now.saturating_duration_since(start).as_secs_f64();
                if secs > 0.0 {
                    self.estimate = Some(self.frames_elapsed as f64 / secs);
                }
            }
        }
        self.frames_elapsed += 1;
    }

    /// Frames recorded so far.
    pub fn frames_elapsed(&self) -> u64 {
        self.frames_elapsed
    }

    /// Current estimate, if at least two frames have been timed.
    pub fn estimate(&self) -> Option<f64> {
        self.estimate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_frame_has_no_estimate() {
        let mut fps = FpsEstimator::new();
        fps.record_frame(Instant::now());

        assert_eq!(fps.frames_elapsed(), 1);
        assert_eq!(fps.estimate(), None);
    }

    #[test]
    fn test_estimate_counts_frames_before_current() {
        let start = Instant::now();
        let mut fps = FpsEstimator::new();

        for i in 0..=10u64 {
            fps.record_frame(start + Duration::from_millis(100 * i));
        }

        // 10 frames elapsed over 1 second when the 11th arrives.
        let estimate = fps.estimate().unwrap();
        assert!((estimate - 10.0).abs() < 1e-9);
        assert_eq!(fps.frames_elapsed(), 11);
    }

    #[test]
    fn test_zero_interval_keeps_previous_estimate() {
        let start = Instant::now();
        let mut fps = FpsEstimator::new();
        fps.record_frame(start);
        fps.record_frame(start);

        assert_eq!(fps.estimate(), None);
        assert_eq!(fps.frames_elapsed(), 2);
    }
}
