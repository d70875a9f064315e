//! Frame pacing.
//!
//! The host calls [`TimeManager::step`] with a monotonically increasing
//! timestamp (seconds) every time it gets a chance to run, for example once
//! per display refresh. A frame fires only once more than `1 / target_fps`
//! seconds have passed since the last fired frame, and the measured elapsed
//! time becomes that frame's delta.

use log::trace;

/// Paces frames to a target rate and measures the per-frame delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeManager {
    target_fps: u32,
    last_step: Option<f64>,
    delta_time: f32,
}

impl TimeManager {
    pub fn new(target_fps: u32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            target_fps,
            last_step: None,
            delta_time: 1.0 / target_fps as f32,
        }
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Seconds between two fired frames at the target rate.
    pub fn frame_interval(&self) -> f64 {
        1.0 / f64::from(self.target_fps)
    }

    /// Delta of the last fired frame, `1 / target_fps` before the first one.
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Timestamp of the last fired frame (or the first recorded call).
    pub fn last_step(&self) -> Option<f64> {
        self.last_step
    }

    /// Offer a frame at `timestamp` seconds.
    ///
    /// The first call only records the timestamp. Later calls return the
    /// frame delta when the frame fires and `None` when it is too early.
    pub fn step(&mut self, timestamp: f64) -> Option<f32> {
        let Some(last) = self.last_step else {
            self.last_step = Some(timestamp);
            return None;
        };
        let elapsed = timestamp - last;
        if elapsed > self.frame_interval() {
            self.delta_time = elapsed as f32;
            self.last_step = Some(timestamp);
            trace!("frame fired, delta={:.4}", self.delta_time);
            Some(self.delta_time)
        } else {
            None
        }
    }
}

impl Default for TimeManager {
    fn default() -> Self {
        Self::new(30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_first_step_only_records() {
        let mut time = TimeManager::new(30);
        assert_eq!(time.step(10.0), None);
        assert_eq!(time.last_step(), Some(10.0));
        assert!(approx_eq(time.delta_time(), 1.0 / 30.0));
    }

    #[test]
    fn test_fires_after_interval() {
        let mut time = TimeManager::new(30);
        time.step(0.0);
        assert_eq!(time.step(0.02), None);
        let delta = time.step(0.05).unwrap();
        assert!(approx_eq(delta, 0.05));
        assert_eq!(time.last_step(), Some(0.05));
    }

    #[test]
    fn test_early_calls_do_not_move_last_step() {
        let mut time = TimeManager::new(10);
        time.step(1.0);
        assert_eq!(time.step(1.05), None);
        assert_eq!(time.step(1.09), None);
        assert_eq!(time.last_step(), Some(1.0));
        assert!(approx_eq(time.step(1.2).unwrap(), 0.2));
    }

    #[test]
    fn test_zero_fps_is_clamped() {
        let time = TimeManager::new(0);
        assert_eq!(time.target_fps(), 1);
    }
}
