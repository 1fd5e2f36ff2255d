//! Frames-per-second readout for the HUD

/// Frames kept in the rolling window
const WINDOW: usize = 60;

/// Rolling FPS over the last `WINDOW` frame timestamps
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; WINDOW],
    frame_index: usize,
    recorded: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frame_times: [0.0; WINDOW],
            frame_index: 0,
            recorded: 0,
            fps: 0,
        }
    }

    /// Record a frame presented at `now_ms` and return the current rate
    pub fn record(&mut self, now_ms: f64) -> u32 {
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % WINDOW;
        self.recorded = (self.recorded + 1).min(WINDOW);

        if self.recorded > 1 {
            // Oldest sample is the next slot once the window has filled
            let oldest = if self.recorded == WINDOW {
                self.frame_times[self.frame_index]
            } else {
                self.frame_times[0]
            };
            let elapsed = now_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((self.recorded - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
        self.fps
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
