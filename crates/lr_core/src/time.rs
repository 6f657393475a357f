use std::time::Instant;

/// Simulation runs at a fixed 60 Hz regardless of render rate.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Frames slower than this feed the accumulator a capped delta instead of
/// the real one, so a long stall cannot queue up hundreds of catch-up steps.
const MAX_FRAME_DT: f64 = 0.25;

const FPS_SAMPLE_COUNT: usize = 60;

/// Fixed-timestep frame clock. Call `begin_frame` once per rendered frame,
/// then drain `while should_step()` for simulation, then `end_frame`.
pub struct FrameClock {
    accumulator: f64,
    last_instant: Instant,
    pub real_dt: f64,
    pub frame_count: u64,
    pub fixed_step_count: u64,
    pub steps_this_frame: u32,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            last_instant: Instant::now(),
            real_dt: 0.0,
            frame_count: 0,
            fixed_step_count: 0,
            steps_this_frame: 0,
            fps_samples: [FIXED_DT; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        self.real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        if self.real_dt > MAX_FRAME_DT {
            log::warn!(
                "Frame took {:.1}ms — capping accumulator to {}ms",
                self.real_dt * 1000.0,
                MAX_FRAME_DT * 1000.0
            );
            self.real_dt = MAX_FRAME_DT;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= FIXED_DT {
            self.accumulator -= FIXED_DT;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
