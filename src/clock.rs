use std::time::Instant;

/// Minimal frame clock - just tracks delta time
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Get delta time since last tick and advance clock
    /// Returns delta in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta
    }

    /// Reset clock to current time
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Frames-per-second average refreshed once per interval
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    interval: f32,
    elapsed: f32,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Count one frame. Returns true when the average was refreshed
    pub fn tick(&mut self, delta: f32) -> bool {
        self.frames += 1;
        self.elapsed += delta;

        if self.elapsed >= self.interval {
            self.fps = self.frames as f32 / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(1.0)
    }
}
