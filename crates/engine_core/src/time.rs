//! Time management for the fixed-rate frame loop.

use std::time::{Duration, Instant};

/// Default frame rate of the scene loop.
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Manages frame timing, elapsed time and the next frame deadline.
#[derive(Debug)]
pub struct Time {
    /// Time when the loop started.
    start_time: Instant,
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Target interval between frames.
    frame_interval: Duration,
    /// When the next frame should start.
    next_frame: Instant,
}

impl Default for Time {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_FPS)
    }
}

impl Time {
    /// Create a new time manager pacing frames at `target_fps`.
    pub fn new(target_fps: u32) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            frame_interval: frame_interval(target_fps),
            next_frame: now,
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// Update timing as if the frame started at `now`.
    pub fn update_at(&mut self, now: Instant) {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.elapsed = now.saturating_duration_since(self.start_time);
        self.frame_count += 1;
        // Schedule from the previous deadline to hold the rate; resync after a long stall.
        self.next_frame += self.frame_interval;
        if self.next_frame < now {
            self.next_frame = now + self.frame_interval;
        }
    }

    /// Elapsed time in whole milliseconds, the clock used for interaction timeouts.
    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Deadline for the next frame.
    pub fn next_frame(&self) -> Instant {
        self.next_frame
    }

    /// Whether the next frame is due at `now`.
    pub fn is_frame_due(&self, now: Instant) -> bool {
        now >= self.next_frame
    }

    /// Get the current FPS (averaged over last frame).
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / fps.max(1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_due_immediately() {
        let time = Time::new(60);
        assert!(time.is_frame_due(Instant::now()));
    }

    #[test]
    fn deadline_advances_by_interval() {
        let mut time = Time::new(50);
        let start = time.next_frame();
        time.update_at(start);
        assert_eq!(time.next_frame(), start + Duration::from_millis(20));
        assert!(!time.is_frame_due(start + Duration::from_millis(5)));
        assert_eq!(time.frame_count(), 1);
    }

    #[test]
    fn stall_resyncs_deadline() {
        let mut time = Time::new(60);
        let late = time.next_frame() + Duration::from_secs(3);
        time.update_at(late);
        assert!(time.next_frame() > late);
        assert!(time.elapsed_millis() >= 3000);
    }

    #[test]
    fn zero_fps_does_not_divide_by_zero() {
        let mut time = Time::new(0);
        let now = time.next_frame();
        time.update_at(now);
        assert_eq!(time.next_frame(), now + Duration::from_secs(1));
    }
}
