//! Platform abstraction layer
//!
//! The simulation never reads a clock. Whatever drives it feeds wall-clock
//! timestamps into a [`FrameClock`], which turns them into fixed `SIM_DT`
//! substeps and keeps a stalled frame from exploding the physics.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_time: Option<f64>,
    accumulator: f32,
    max_frame_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl FrameClock {
    pub fn new(max_frame_dt: f32) -> Self {
        Self {
            last_time: None,
            accumulator: 0.0,
            max_frame_dt: max_frame_dt.max(SIM_DT),
        }
    }

    /// Feed the current time in seconds; returns how many `SIM_DT` steps to run.
    ///
    /// The first call only records the timestamp. Frame deltas are clamped to
    /// `max_frame_dt` and at most `MAX_SUBSTEPS` steps come out of one call.
    pub fn advance(&mut self, now_secs: f64) -> u32 {
        let Some(last) = self.last_time.replace(now_secs) else {
            return 0;
        };
        let dt = ((now_secs - last) as f32).clamp(0.0, self.max_frame_dt);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop backlog the substep cap could not drain
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Forget the previous timestamp (after a pause or focus loss)
    pub fn reset(&mut self) {
        self.last_time = None;
        self.accumulator = 0.0;
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / SIM_DT
    }
}
