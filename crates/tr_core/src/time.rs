use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Fixed-timestep accumulator. Each successful `should_step()` is one
/// simulation tick; animation and movement advance only on ticks.
pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self::with_fixed_dt(1.0 / 60.0)
    }

    pub fn with_fixed_dt(fixed_dt: f64) -> Self {
        Self {
            fixed_dt,
            max_accumulator: 0.25,
            accumulator: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [fixed_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / fixed_dt,
            smoothed_frame_time_ms: fixed_dt * 1000.0,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.begin_frame_with(dt);
    }

    /// Feed an explicit wall-clock delta (seconds) into the accumulator.
    pub fn begin_frame_with(&mut self, dt: f64) {
        self.real_dt = dt;

        // Spiral-of-death cap
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    pub fn end_frame(&self) {
        log::trace!(
            "frame {}: {} steps, {:.2} ms",
            self.frame_count,
            self.steps_this_frame,
            self.real_dt * 1000.0
        );
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_steps(time: &mut TimeState) -> u32 {
        while time.should_step() {}
        time.steps_this_frame
    }

    #[test]
    fn steps_match_elapsed_time() {
        // Powers of two keep the arithmetic exact.
        let mut time = TimeState::with_fixed_dt(1.0 / 64.0);
        time.begin_frame_with(3.5 / 64.0);
        assert_eq!(drain_steps(&mut time), 3);

        // The leftover half step carries into the next frame.
        time.begin_frame_with(0.5 / 64.0);
        assert_eq!(drain_steps(&mut time), 1);
        assert_eq!(time.fixed_step_count, 4);
        assert_eq!(time.frame_count, 2);
    }

    #[test]
    fn short_frames_produce_zero_steps() {
        let mut time = TimeState::with_fixed_dt(0.02);
        time.begin_frame_with(0.01);
        assert_eq!(drain_steps(&mut time), 0);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut time = TimeState::with_fixed_dt(1.0 / 16.0);
        time.begin_frame_with(10.0);
        assert!((time.real_dt - time.max_accumulator).abs() < 1e-9);
        assert_eq!(drain_steps(&mut time), 4);
    }

    #[test]
    fn smoothed_fps_tracks_frame_time() {
        let mut time = TimeState::new();
        for _ in 0..FPS_SAMPLE_COUNT {
            time.begin_frame_with(1.0 / 30.0);
        }
        assert!((time.smoothed_fps - 30.0).abs() < 0.01);
        assert!((time.smoothed_frame_time_ms - 33.333).abs() < 0.01);
    }
}
