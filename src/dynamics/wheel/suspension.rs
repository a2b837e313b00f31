use crate::{
    config::DEFAULT_SUSPENSION_REST_LENGTH,
    core::rigidbody::BodySet,
    dynamics::{
        constraint::{Joint, JointSettings},
        jacobian::{BodyPair, ConstraintAxis},
        settings::{HasSolverSettings, SolverProgress, SolverSettings},
        spring::{HasSpringSettings, SpringSettings},
    },
    error::Result,
};

use super::WheelContact;

/// Soft spring holding the vehicle at the suspension rest length above the contact.
///
/// Its accumulated impulse only ever pushes (`>= 0`) and is the normal load
/// the brake and driving motor use for their friction cones.
#[derive(Debug, Clone)]
pub struct WheelSuspension {
    rest_length: f32,
    joint: JointSettings,

    axis: ConstraintAxis,
    bias_velocity: f32,
    softness: f32,
    error: f32,
    accumulated_impulse: f32,
    pair: Option<BodyPair>,

    is_active: bool,
    solver_settings: SolverSettings,
    progress: SolverProgress,
}

impl Default for WheelSuspension {
    fn default() -> Self {
        Self::new(DEFAULT_SUSPENSION_REST_LENGTH, SpringSettings::default())
    }
}

impl WheelSuspension {
    pub fn new(rest_length: f32, spring: SpringSettings) -> Self {
        Self {
            rest_length: rest_length.max(0.0),
            joint: JointSettings::new(spring),
            axis: ConstraintAxis::default(),
            bias_velocity: 0.0,
            softness: 0.0,
            error: 0.0,
            accumulated_impulse: 0.0,
            pair: None,
            is_active: true,
            solver_settings: SolverSettings::default(),
            progress: SolverProgress::default(),
        }
    }

    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    pub fn set_rest_length(&mut self, length: f32) {
        self.rest_length = length.max(0.0);
    }

    /// Compression measured by the last prestep; negative when extended.
    pub fn error(&self) -> f32 {
        self.error
    }

    pub fn bias_velocity(&self) -> f32 {
        self.bias_velocity
    }

    pub fn softness(&self) -> f32 {
        self.softness
    }

    pub fn axis(&self) -> &ConstraintAxis {
        &self.axis
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

    pub fn prestep(
        &mut self,
        dt: f32,
        bodies: &BodySet,
        pair: BodyPair,
        contact: &WheelContact,
    ) -> Result<()> {
        let (error_reduction, softness) = self
            .joint
            .spring()
            .compute_error_reduction_and_softness(dt, 1.0 / dt)?;

        self.axis = ConstraintAxis::along(bodies, &pair, contact.point, contact.normal)?
            .with_softness(softness);
        self.softness = softness;
        self.error = self.rest_length - contact.suspension_length;
        self.bias_velocity = self
            .joint
            .clamp_corrective_velocity(self.error * error_reduction);
        self.pair = Some(pair);
        self.progress.reset();
        Ok(())
    }

    pub fn exclusive_update(&self, bodies: &mut BodySet) {
        if let Some(pair) = &self.pair {
            self.axis
                .jacobian
                .apply_impulse(bodies, pair, self.accumulated_impulse);
        }
    }

    pub fn solve_iteration(&mut self, bodies: &mut BodySet) -> f32 {
        let Some(pair) = self.pair else {
            return 0.0;
        };

        let velocity = self.axis.jacobian.relative_velocity(bodies, &pair);
        let lambda = (velocity - self.bias_velocity + self.softness * self.accumulated_impulse)
            * self.axis.velocity_to_impulse;

        let previous = self.accumulated_impulse;
        self.accumulated_impulse = (previous + lambda).max(0.0);
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
}

impl HasSolverSettings for WheelSuspension {
    fn solver_settings(&self) -> &SolverSettings {
        &self.solver_settings
    }

    fn solver_settings_mut(&mut self) -> &mut SolverSettings {
        &mut self.solver_settings
    }
}

impl HasSpringSettings for WheelSuspension {
    fn spring_settings(&self) -> &SpringSettings {
        self.joint.spring()
    }

    fn spring_settings_mut(&mut self) -> &mut SpringSettings {
        self.joint.spring_mut()
    }
}

impl Joint for WheelSuspension {
    fn joint_settings(&self) -> &JointSettings {
        &self.joint
    }

    fn joint_settings_mut(&mut self) -> &mut JointSettings {
        &mut self.joint
    }
}
