use std::time::Duration;

/// Fixed timestep accumulator for the simulation loop.
///
/// Variable wall-clock deltas go in, a whole number of fixed physics steps
/// comes out. Leftover time carries to the next call.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    max_steps: u32,
    steps_run: u64,
}

impl FixedTimestep {
    pub fn new(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
            steps_run: 0,
        }
    }

    /// Add elapsed time. Returns the number of fixed steps to run, at most
    /// `max_steps`; time beyond the cap is dropped (spiral-of-death guard).
    pub fn accumulate(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        self.steps_run += steps as u64;
        steps
    }

    /// Fraction of a step still pending (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Target wall-clock gap between steps of the free-running loop.
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f32(self.dt)
    }

    /// Total steps handed out so far.
    pub fn steps_run(&self) -> u64 {
        self.steps_run
    }
}
