use std::time::{Duration, Instant};

/// Delay between two render ticks for the given refresh rate:
/// `max(1, 1000 / fps)` milliseconds.
pub fn frame_interval(fps: u32) -> Duration {
    let ms = if fps == 0 { 1 } else { (1000 / fps).max(1) };
    Duration::from_millis(ms as u64)
}

/// Fixed-interval poll driving the render loop.
///
/// The next tick is always scheduled a full interval after the previous one
/// completed, whether or not that tick produced a frame.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Duration,
    next_due: Instant,
}

impl FrameScheduler {
    pub fn new(fps: u32, now: Instant) -> Self {
        Self {
            interval: frame_interval(fps),
            next_due: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_fps(&mut self, fps: u32) {
        self.interval = frame_interval(fps);
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_due
    }

    /// Mark the current tick as finished and schedule the next one.
    pub fn reschedule(&mut self, now: Instant) {
        self.next_due = now + self.interval;
    }

    /// Time left until the next tick, zero if it is already due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}
