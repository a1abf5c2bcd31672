use std::time::{Duration, Instant};
use winit::window::Window;

/// Frame counter that writes FPS into the window title twice a second.
pub struct FrameTiming {
    last_report: Instant,
    frames: u32,
    base_title: String,
}

impl FrameTiming {
    pub fn new(base_title: String) -> Self {
        Self {
            last_report: Instant::now(),
            frames: 0,
            base_title,
        }
    }

    pub fn tick(&mut self, window: &Window, now: Instant) {
        self.frames = self.frames.saturating_add(1);
        let elapsed = now.saturating_duration_since(self.last_report);
        if elapsed >= Duration::from_millis(500) {
            let fps = self.frames as f32 / elapsed.as_secs_f32();
            window.set_title(&format!("{} - {:.1} fps", self.base_title, fps));
            self.frames = 0;
            self.last_report = now;
        }
    }
}
