//! Time management utilities
//!
//! [`FrameTime`] is the immutable snapshot every system receives on tick.
//! [`Timer`] derives it from the wall clock for a host loop; tests and fixed
//! step hosts can build snapshots directly with [`FrameTime::new`] or
//! [`FrameTime::advance`].

use std::time::{Duration, Instant};

/// Time snapshot passed to every system tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    delta_seconds: f32,
    total_seconds: f32,
}

impl FrameTime {
    /// Create a snapshot; negative or NaN inputs are clamped to zero
    pub fn new(delta_seconds: f32, total_seconds: f32) -> Self {
        Self {
            delta_seconds: non_negative(delta_seconds),
            total_seconds: non_negative(total_seconds),
        }
    }

    /// Seconds elapsed since the previous tick
    pub fn delta_seconds(&self) -> f32 {
        self.delta_seconds
    }

    /// Seconds elapsed since the clock started
    pub fn total_seconds(&self) -> f32 {
        self.total_seconds
    }

    /// Next snapshot of a fixed-step clock
    pub fn advance(self, delta_seconds: f32) -> Self {
        let delta_seconds = non_negative(delta_seconds);
        Self::new(delta_seconds, self.total_seconds + delta_seconds)
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }
    
    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) -> FrameTime {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        self.frame_time()
    }

    /// Snapshot of the last update
    pub fn frame_time(&self) -> FrameTime {
        FrameTime::new(self.delta_time, self.total_time)
    }
    
    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }
    
    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }
    
    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
    
    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Instant,
}

impl Stopwatch {
    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }
    
    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
    
    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }
}
