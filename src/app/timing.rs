use std::time::{Duration, Instant};
use winit::window::Window;

/// Frame cadence and the fps/mode readout in the window title.
pub struct FrameTiming {
    last_frame_time: Option<Instant>,
    last_title_time: Instant,
    frame_count: u32,
    frame_dt: f32,
    render_ms: f32,
    base_title: String,
}

impl FrameTiming {
    pub fn new(base_title: impl Into<String>) -> Self {
        Self {
            last_frame_time: None,
            last_title_time: Instant::now(),
            frame_count: 0,
            frame_dt: 1.0 / 60.0,
            render_ms: 0.0,
            base_title: base_title.into(),
        }
    }

    pub fn set_render_ms(&mut self, render_ms: f32) {
        self.render_ms = render_ms;
    }

    pub fn update(&mut self, window: Option<&Window>, now: Instant, mode: &str) {
        let dt = match self.last_frame_time {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::from_millis(16),
        };
        self.last_frame_time = Some(now);
        self.frame_dt = dt.as_secs_f32();

        self.frame_count = self.frame_count.saturating_add(1);
        let elapsed = now.saturating_duration_since(self.last_title_time);
        if elapsed.as_secs_f32() >= 0.5 {
            if let Some(window) = window {
                window.set_title(&self.title(elapsed, mode));
            }
            self.frame_count = 0;
            self.last_title_time = now;
        }
    }

    fn title(&self, elapsed: Duration, mode: &str) -> String {
        let fps = self.frame_count as f32 / elapsed.as_secs_f32().max(f32::EPSILON);
        format!(
            "{} [{}] - {:.1} fps (frame {:.2} ms, render {:.2} ms)",
            self.base_title,
            mode,
            fps,
            self.frame_dt * 1000.0,
            self.render_ms
        )
    }
}
