//! Spring-like tuning of soft constraints.
//!
//! A soft constraint bleeds off its position error through a bias velocity
//! (`error * error_reduction`) and lets the accumulated impulse yield slightly
//! (`softness`). Both come either from a physical stiffness/damping pair or, in
//! advanced mode, directly from the user.

use serde::{Deserialize, Serialize};

use crate::{
    config::{
        DEFAULT_ADVANCED_ERROR_REDUCTION_FACTOR, DEFAULT_ADVANCED_SOFTNESS,
        DEFAULT_SPRING_DAMPING, DEFAULT_SPRING_STIFFNESS,
    },
    error::{Result, SolverError},
};

/// Direct solver-space spring constants that bypass stiffness/damping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringAdvancedSettings {
    error_reduction_factor: f32,
    softness: f32,
    use_advanced_settings: bool,
}

impl Default for SpringAdvancedSettings {
    fn default() -> Self {
        Self {
            error_reduction_factor: DEFAULT_ADVANCED_ERROR_REDUCTION_FACTOR,
            softness: DEFAULT_ADVANCED_SOFTNESS,
            use_advanced_settings: false,
        }
    }
}

impl SpringAdvancedSettings {
    /// Fraction of the position error corrected per step, in `[0, 1]`.
    pub fn error_reduction_factor(&self) -> f32 {
        self.error_reduction_factor
    }

    pub fn set_error_reduction_factor(&mut self, value: f32) {
        self.error_reduction_factor = value.max(0.0).min(1.0);
    }

    pub fn softness(&self) -> f32 {
        self.softness
    }

    pub fn set_softness(&mut self, value: f32) {
        self.softness = value.max(0.0);
    }

    pub fn use_advanced_settings(&self) -> bool {
        self.use_advanced_settings
    }

    pub fn set_use_advanced_settings(&mut self, enabled: bool) {
        self.use_advanced_settings = enabled;
    }
}

/// Stiffness and damping of a soft constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringSettings {
    stiffness: f32,
    damping: f32,
    advanced: SpringAdvancedSettings,
}

impl Default for SpringSettings {
    fn default() -> Self {
        Self {
            stiffness: DEFAULT_SPRING_STIFFNESS,
            damping: DEFAULT_SPRING_DAMPING,
            advanced: SpringAdvancedSettings::default(),
        }
    }
}

impl SpringSettings {
    pub fn new(stiffness: f32, damping: f32) -> Self {
        let mut settings = Self::default();
        settings.set_stiffness(stiffness);
        settings.set_damping(damping);
        settings
    }

    pub fn stiffness(&self) -> f32 {
        self.stiffness
    }

    pub fn set_stiffness(&mut self, value: f32) {
        self.stiffness = value.max(0.0);
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn set_damping(&mut self, value: f32) {
        self.damping = value.max(0.0);
    }

    pub fn advanced(&self) -> &SpringAdvancedSettings {
        &self.advanced
    }

    pub fn advanced_mut(&mut self) -> &mut SpringAdvancedSettings {
        &mut self.advanced
    }

    /// Returns `(error_reduction, softness)` for one step of length `dt`.
    ///
    /// `update_rate` is normally `1 / dt`. Fails when the spring is neither
    /// stiff nor damped, or when the constants are so large or so small that
    /// either coefficient would not be finite.
    pub fn compute_error_reduction_and_softness(
        &self,
        dt: f32,
        update_rate: f32,
    ) -> Result<(f32, f32)> {
        let (error_reduction, softness) = if self.advanced.use_advanced_settings {
            (
                self.advanced.error_reduction_factor * update_rate,
                self.advanced.softness * update_rate,
            )
        } else {
            let denominator = dt * self.stiffness + self.damping;
            if !(denominator.is_finite() && denominator > 0.0) {
                return Err(SolverError::DegenerateSpring);
            }
            let inverse = 1.0 / denominator;
            (self.stiffness * inverse, update_rate * inverse)
        };

        if !(error_reduction.is_finite() && softness.is_finite()) {
            return Err(SolverError::DegenerateSpring);
        }
        Ok((error_reduction, softness))
    }
}

/// Capability of constraints whose correction is tuned by a spring.
pub trait HasSpringSettings {
    fn spring_settings(&self) -> &SpringSettings;
    fn spring_settings_mut(&mut self) -> &mut SpringSettings;
}
