use std::time::Instant;

/// Frame clock - tracks delta time and a rolling frame rate
#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
    frames: u32,
    elapsed: f32,
    fps: f32,
}

/// Seconds between frame rate updates
const FPS_WINDOW: f32 = 1.0;

impl FrameClock {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            frames: 0,
            elapsed: 0.0,
            fps: 0.0,
        }
    }

    /// Get delta time since last tick and advance clock
    /// Returns delta in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.record(delta);
        delta
    }

    fn record(&mut self, delta: f32) {
        self.frames += 1;
        self.elapsed += delta;
        if self.elapsed >= FPS_WINDOW {
            self.fps = self.frames as f32 / self.elapsed;
            log::trace!("{:.1} fps", self.fps);
            self.frames = 0;
            self.elapsed = 0.0;
        }
    }

    /// Frames per second over the last completed window, 0 before the first
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Reset clock to current time
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
        self.frames = 0;
        self.elapsed = 0.0;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
