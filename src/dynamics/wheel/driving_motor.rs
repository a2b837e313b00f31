use crate::{
    config::DEFAULT_GRIP_FRICTION,
    core::rigidbody::BodySet,
    dynamics::{
        constraint::Motor,
        friction::{FrictionBlender, SharedBlender},
        jacobian::{BodyPair, ConstraintAxis},
        settings::{HasSolverSettings, SolverProgress, SolverSettings},
    },
    error::Result,
};

use super::WheelContact;

/// Drives a wheel toward a target speed along its rolling direction.
///
/// Owns the axis the brake rides on, so its prestep must run before the brake's.
#[derive(Debug, Clone)]
pub struct WheelDrivingMotor {
    target_speed: f32,
    maximum_forward_force: f32,
    maximum_backward_force: f32,
    grip_friction: f32,
    grip_blender: SharedBlender,

    axis: ConstraintAxis,
    blended_grip: f32,
    max_forward_impulse: f32,
    max_backward_impulse: f32,
    accumulated_impulse: f32,
    pair: Option<BodyPair>,

    is_active: bool,
    solver_settings: SolverSettings,
    progress: SolverProgress,
}

impl Default for WheelDrivingMotor {
    fn default() -> Self {
        Self {
            target_speed: 0.0,
            maximum_forward_force: f32::MAX,
            maximum_backward_force: f32::MAX,
            grip_friction: DEFAULT_GRIP_FRICTION,
            grip_blender: SharedBlender::default(),
            axis: ConstraintAxis::default(),
            blended_grip: 0.0,
            max_forward_impulse: f32::MAX,
            max_backward_impulse: f32::MAX,
            accumulated_impulse: 0.0,
            pair: None,
            is_active: false,
            solver_settings: SolverSettings::default(),
            progress: SolverProgress::default(),
        }
    }
}

impl WheelDrivingMotor {
    pub fn new(maximum_forward_force: f32, maximum_backward_force: f32) -> Self {
        let mut motor = Self::default();
        motor.set_maximum_forward_force(maximum_forward_force);
        motor.set_maximum_backward_force(maximum_backward_force);
        motor
    }

    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }

    pub fn set_target_speed(&mut self, speed: f32) {
        self.target_speed = speed;
    }

    pub fn maximum_forward_force(&self) -> f32 {
        self.maximum_forward_force
    }

    pub fn set_maximum_forward_force(&mut self, force: f32) {
        self.maximum_forward_force = force.max(0.0);
    }

    pub fn maximum_backward_force(&self) -> f32 {
        self.maximum_backward_force
    }

    pub fn set_maximum_backward_force(&mut self, force: f32) {
        self.maximum_backward_force = force.max(0.0);
    }

    pub fn grip_friction(&self) -> f32 {
        self.grip_friction
    }

    pub fn set_grip_friction(&mut self, value: f32) {
        self.grip_friction = value.max(0.0);
    }

    pub fn set_grip_blender(&mut self, blender: impl FrictionBlender + 'static) {
        self.grip_blender = SharedBlender::new(blender);
    }

    /// Axis computed by the last prestep.
    pub fn axis(&self) -> &ConstraintAxis {
        &self.axis
    }

    pub fn blended_grip(&self) -> f32 {
        self.blended_grip
    }

    pub fn accumulated_impulse(&self) -> f32 {
        self.accumulated_impulse
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    pub fn is_active_in_solver(&self) -> bool {
        self.is_active
            && self.pair.is_some()
            && self.progress.allows_iteration(&self.solver_settings)
    }

    pub fn relative_velocity(&self, bodies: &BodySet) -> f32 {
        self.pair
            .as_ref()
            .map(|pair| self.axis.jacobian.relative_velocity(bodies, pair))
            .unwrap_or(0.0)
    }

    /// Rebuilds the driving axis in the contact plane and the per-step force caps.
    pub fn prestep(
        &mut self,
        dt: f32,
        bodies: &BodySet,
        pair: BodyPair,
        contact: &WheelContact,
    ) -> Result<()> {
        let forward = (contact.forward - contact.normal * contact.forward.dot(contact.normal))
            .normalize_or_zero();
        self.axis = ConstraintAxis::along(bodies, &pair, contact.point, forward)?;
        self.pair = Some(pair);
        self.progress.reset();

        (self.max_forward_impulse, _) = self.compute_max_forces(self.maximum_forward_force, dt);
        (self.max_backward_impulse, _) = self.compute_max_forces(self.maximum_backward_force, dt);
        self.blended_grip =
            self.grip_blender
                .blend(self.grip_friction, contact.material.static_friction, false);
        Ok(())
    }

    pub fn exclusive_update(&self, bodies: &mut BodySet) {
        if let Some(pair) = &self.pair {
            self.axis
                .jacobian
                .apply_impulse(bodies, pair, self.accumulated_impulse);
        }
    }

    /// One iteration toward the target speed, bounded by the force caps and by
    /// the grip available under the current suspension load.
    pub fn solve_iteration(&mut self, bodies: &mut BodySet, suspension_impulse: f32) -> f32 {
        let Some(pair) = self.pair else {
            return 0.0;
        };

        let velocity = self.axis.jacobian.relative_velocity(bodies, &pair);
        let lambda = (velocity - self.target_speed) * self.axis.velocity_to_impulse;

        let grip_limit = (self.blended_grip * suspension_impulse).max(0.0);
        let upper = self.max_forward_impulse.min(grip_limit);
        let lower = -self.max_backward_impulse.min(grip_limit);

        let previous = self.accumulated_impulse;
        self.accumulated_impulse = (previous + lambda).clamp(lower, upper);
        let delta = self.accumulated_impulse - previous;

        self.axis.jacobian.apply_impulse(bodies, &pair, delta);
        delta
    }

    pub(crate) fn record_iteration(&mut self, impulse: f32) {
        self.progress.record(impulse, &self.solver_settings);
    }

    pub fn reset(&mut self) {
        self.accumulated_impulse = 0.0;
        self.pair = None;
    }

    /// Drops the warm-start impulse while keeping the captured bodies.
    pub(crate) fn clear_impulse(&mut self) {
        self.accumulated_impulse = 0.0;
    }
}

impl HasSolverSettings for WheelDrivingMotor {
    fn solver_settings(&self) -> &SolverSettings {
        &self.solver_settings
    }

    fn solver_settings_mut(&mut self) -> &mut SolverSettings {
        &mut self.solver_settings
    }
}

impl Motor for WheelDrivingMotor {}
