//! Capability bases shared by concrete constraints.
//!
//! Velocity-only constraints (friction, motors) are [`Motor`]s and only need a
//! force cap. Position-correcting constraints are [`Joint`]s and carry a
//! corrective velocity cap plus spring tuning.

use super::{
    settings::HasSolverSettings,
    spring::{HasSpringSettings, SpringSettings},
};

/// Converts a force cap into per-step impulse caps `(max * dt, (max * dt)^2)`.
///
/// `f32::MAX` means unbounded and saturates both terms instead of overflowing the square.
pub fn compute_max_forces(max_force: f32, dt: f32) -> (f32, f32) {
    if max_force < f32::MAX {
        let max_force_dt = max_force * dt;
        (max_force_dt, max_force_dt * max_force_dt)
    } else {
        (f32::MAX, f32::MAX)
    }
}

/// Force-capped velocity constraint without a position target.
pub trait Motor: HasSolverSettings {
    fn compute_max_forces(&self, max_force: f32, dt: f32) -> (f32, f32) {
        compute_max_forces(max_force, dt)
    }
}

/// Numeric rails of a position-correcting constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointSettings {
    max_corrective_velocity: f32,
    max_corrective_velocity_squared: f32,
    spring: SpringSettings,
}

impl Default for JointSettings {
    fn default() -> Self {
        Self {
            max_corrective_velocity: f32::MAX,
            max_corrective_velocity_squared: f32::MAX,
            spring: SpringSettings::default(),
        }
    }
}

impl JointSettings {
    pub fn new(spring: SpringSettings) -> Self {
        Self {
            spring,
            ..Self::default()
        }
    }

    /// Upper bound on the speed used to correct position error.
    pub fn max_corrective_velocity(&self) -> f32 {
        self.max_corrective_velocity
    }

    pub fn max_corrective_velocity_squared(&self) -> f32 {
        self.max_corrective_velocity_squared
    }

    pub fn set_max_corrective_velocity(&mut self, value: f32) {
        self.max_corrective_velocity = value.max(0.0);
        self.max_corrective_velocity_squared = if self.max_corrective_velocity >= f32::MAX {
            f32::MAX
        } else {
            self.max_corrective_velocity * self.max_corrective_velocity
        };
    }

    /// Limits a bias velocity to `[-max, max]`.
    pub fn clamp_corrective_velocity(&self, bias: f32) -> f32 {
        bias.clamp(-self.max_corrective_velocity, self.max_corrective_velocity)
    }

    pub fn spring(&self) -> &SpringSettings {
        &self.spring
    }

    pub fn spring_mut(&mut self) -> &mut SpringSettings {
        &mut self.spring
    }
}

/// Position-correcting constraint: rate-limited and spring-tuned.
pub trait Joint: HasSolverSettings + HasSpringSettings {
    fn joint_settings(&self) -> &JointSettings;
    fn joint_settings_mut(&mut self) -> &mut JointSettings;

    fn max_corrective_velocity(&self) -> f32 {
        self.joint_settings().max_corrective_velocity()
    }

    fn set_max_corrective_velocity(&mut self, value: f32) {
        self.joint_settings_mut().set_max_corrective_velocity(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_forces_scale_with_timestep() {
        let (dt_force, squared) = compute_max_forces(100.0, 0.5);
        assert_eq!(dt_force, 50.0);
        assert_eq!(squared, 2500.0);
    }

    #[test]
    fn unbounded_force_saturates_without_overflow() {
        let (dt_force, squared) = compute_max_forces(f32::MAX, 1.0 / 60.0);
        assert_eq!(dt_force, f32::MAX);
        assert_eq!(squared, f32::MAX);
        assert!(squared.is_finite());
    }

    #[test]
    fn corrective_velocity_caches_square_and_clamps() {
        let mut settings = JointSettings::default();
        assert_eq!(settings.max_corrective_velocity_squared(), f32::MAX);

        settings.set_max_corrective_velocity(3.0);
        assert_eq!(settings.max_corrective_velocity_squared(), 9.0);
        assert_eq!(settings.clamp_corrective_velocity(-7.0), -3.0);

        settings.set_max_corrective_velocity(-1.0);
        assert_eq!(settings.max_corrective_velocity(), 0.0);
        assert_eq!(settings.max_corrective_velocity_squared(), 0.0);
    }
}
