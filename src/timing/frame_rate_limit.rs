use std::time::{Duration, Instant};

use std::collections::VecDeque;

use super::FrameRateLimit;

impl FrameRateLimit {
    /// Create a new frame rate limit for a given target fps. A target of
    /// zero is treated as one frame per second.
    pub fn new(target_fps: u32, frames_to_track: usize) -> Self {
        Self {
            frames_to_track,
            frame_starts: VecDeque::with_capacity(frames_to_track),
            target_duration: Duration::from_secs(1) / target_fps.max(1),
        }
    }

    /// Call at the beginning of each frame to establish the start-point when
    /// computing elapsed time.
    pub fn start_frame(&mut self) {
        if self.frame_starts.len() > self.frames_to_track {
            self.frame_starts.pop_back();
        }
        self.frame_starts.push_front(Instant::now());
    }

    /// Sleep for any remaining time in the target fps.
    pub fn sleep_to_limit(&self) {
        let Some(frame_start) = self.frame_starts.front() else {
            return;
        };
        let elapsed = Instant::now() - *frame_start;
        if elapsed < self.target_duration {
            spin_sleep::sleep(self.target_duration - elapsed);
        }
    }

    /// Return the average amount of time spent on the last n frames.
    /// N is the value given for `frames_to_track` when creating the frame
    /// rate limit.
    pub fn avg_frame_time(&self) -> Duration {
        let Some(oldest_frame) = self.frame_starts.back() else {
            return Duration::ZERO;
        };
        let total_duration = Instant::now() - *oldest_frame;
        total_duration / self.frame_starts.len().max(1) as u32
    }
}

#[cfg(test)]
mod test {
    use super::super::FrameRateLimit;

    #[test]
    fn tracked_frames_stay_bounded() {
        let mut limit = FrameRateLimit::new(120, 4);
        for _ in 0..32 {
            limit.start_frame();
        }
        assert!(limit.frame_starts.len() <= 5);
    }

    #[test]
    fn sleep_without_frames_does_not_panic() {
        let limit = FrameRateLimit::new(60, 2);
        limit.sleep_to_limit();
    }

    #[test]
    fn a_zero_target_fps_does_not_panic() {
        let limit = FrameRateLimit::new(0, 2);
        assert_eq!(limit.target_duration.as_secs(), 1);
    }
}
