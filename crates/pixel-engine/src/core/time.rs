/// Default cap on fixed steps run for a single frame.
pub const DEFAULT_MAX_STEPS: u32 = 10;

/// Fixed timestep accumulator in whole milliseconds.
/// Ensures game logic runs at a consistent rate regardless of frame time.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed tick length. Never zero.
    dt_ms: u32,
    max_steps: u32,
    /// Frame time not yet consumed by a tick.
    accumulator_ms: u32,
}

impl FixedTimestep {
    pub fn new(dt_ms: u32) -> Self {
        Self::with_max_steps(dt_ms, DEFAULT_MAX_STEPS)
    }

    pub fn with_max_steps(dt_ms: u32, max_steps: u32) -> Self {
        Self {
            dt_ms: dt_ms.max(1),
            max_steps: max_steps.max(1),
            accumulator_ms: 0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_ms: u32) -> u32 {
        // Cap to prevent a spiral of death after a long stall.
        let cap = self.dt_ms.saturating_mul(self.max_steps);
        self.accumulator_ms = self.accumulator_ms.saturating_add(frame_ms).min(cap);
        let steps = self.accumulator_ms / self.dt_ms;
        self.accumulator_ms -= steps * self.dt_ms;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator_ms as f32 / self.dt_ms as f32
    }

    /// The fixed tick length in milliseconds.
    pub fn dt_ms(&self) -> u32 {
        self.dt_ms
    }
}
