use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_MAXIMUM_ITERATION_COUNT, DEFAULT_MINIMUM_IMPULSE, DEFAULT_MINIMUM_ITERATION_COUNT,
};

/// Per-constraint iteration policy consulted by the solver loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    minimum_iteration_count: u32,
    maximum_iteration_count: u32,
    minimum_impulse: f32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            minimum_iteration_count: DEFAULT_MINIMUM_ITERATION_COUNT,
            maximum_iteration_count: DEFAULT_MAXIMUM_ITERATION_COUNT,
            minimum_impulse: DEFAULT_MINIMUM_IMPULSE,
        }
    }
}

impl SolverSettings {
    /// Quiet iterations required before the constraint may stop early.
    pub fn minimum_iteration_count(&self) -> u32 {
        self.minimum_iteration_count
    }

    pub fn set_minimum_iteration_count(&mut self, count: u32) {
        self.minimum_iteration_count = count;
    }

    pub fn maximum_iteration_count(&self) -> u32 {
        self.maximum_iteration_count
    }

    pub fn set_maximum_iteration_count(&mut self, count: u32) {
        self.maximum_iteration_count = count;
    }

    /// Impulse magnitude under which an iteration counts as quiet.
    pub fn minimum_impulse(&self) -> f32 {
        self.minimum_impulse
    }

    pub fn set_minimum_impulse(&mut self, impulse: f32) {
        self.minimum_impulse = impulse.max(0.0);
    }
}

/// Capability every constraint exposes to the outer solver loop.
pub trait HasSolverSettings {
    fn solver_settings(&self) -> &SolverSettings;
    fn solver_settings_mut(&mut self) -> &mut SolverSettings;
}

/// Iteration bookkeeping of one constraint within the current step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverProgress {
    iterations: u32,
    quiet_iterations: u32,
    exhausted: bool,
}

impl SolverProgress {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Whether another iteration may run. A maximum of zero keeps the
    /// constraint out of the solve entirely.
    pub fn allows_iteration(&self, settings: &SolverSettings) -> bool {
        !self.exhausted && self.iterations < settings.maximum_iteration_count
    }

    /// Records one iteration's impulse magnitude. Returns `false` once the
    /// constraint should sit out the rest of the step.
    pub fn record(&mut self, impulse: f32, settings: &SolverSettings) -> bool {
        self.iterations += 1;
        if impulse.abs() < settings.minimum_impulse {
            self.quiet_iterations += 1;
        } else {
            self.quiet_iterations = 0;
        }

        if self.quiet_iterations > settings.minimum_iteration_count
            || self.iterations >= settings.maximum_iteration_count
        {
            self.exhausted = true;
        }
        !self.exhausted
    }
}
