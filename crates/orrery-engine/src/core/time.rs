use crate::api::config::SpinMode;

/// Monotonic start timestamp captured when the render loop starts.
/// No pause state: stopping the loop discards the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    start_ms: f64,
    last_ms: f64,
}

impl SimulationClock {
    pub fn start(now_ms: f64) -> Self {
        Self {
            start_ms: now_ms,
            last_ms: now_ms,
        }
    }

    /// Seconds since start. Clamped at zero if the host clock steps back.
    pub fn elapsed_secs(&self, now_ms: f64) -> f32 {
        ((now_ms - self.start_ms).max(0.0) / 1000.0) as f32
    }

    /// Tick the clock for a new frame, returning the elapsed time since start
    /// and the wall-clock delta since the previous tick (both seconds).
    pub fn tick(&mut self, now_ms: f64) -> (f32, f32) {
        let dt = ((now_ms - self.last_ms).max(0.0) / 1000.0) as f32;
        self.last_ms = self.last_ms.max(now_ms);
        (self.elapsed_secs(now_ms), dt)
    }
}

/// Multiplier applied to per-frame spin rates for one frame.
pub fn spin_steps(mode: SpinMode, frame_dt: f32) -> f32 {
    match mode {
        SpinMode::PerFrame => 1.0,
        SpinMode::Timed { reference_fps } => frame_dt * reference_fps.max(0.0),
    }
}
