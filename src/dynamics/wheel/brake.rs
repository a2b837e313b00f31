use crate::{
    config::{
        DEFAULT_KINETIC_BRAKING_COEFFICIENT, DEFAULT_ROLLING_COEFFICIENT,
        DEFAULT_STATIC_BRAKING_COEFFICIENT, DEFAULT_STATIC_FRICTION_VELOCITY_THRESHOLD,
    },
    core::{rigidbody::BodySet, types::InteractionProperties},
    dynamics::{
        constraint::Motor,
        friction::{braking_coefficient, FrictionBlender, SharedBlender},
        jacobian::{BodyPair, ConstraintAxis, JacobianRow},
        settings::{HasSolverSettings, SolverProgress, SolverSettings},
    },
};

/// Rolling resistance and braking friction of one wheel.
///
/// The brake has no axis of its own: every prestep it copies the driving
/// motor's axis, and every iteration its impulse is bounded by the
/// suspension's current load (a Coulomb friction cone).
#[derive(Debug, Clone)]
pub struct WheelBrake {
    kinetic_braking_coefficient: f32,
    static_braking_coefficient: f32,
    rolling_coefficient: f32,
    static_friction_velocity_threshold: f32,
    is_braking: bool,
    friction_blender: SharedBlender,

    blended_coefficient: f32,
    accumulated_impulse: f32,
    jacobian: JacobianRow,
    velocity_to_impulse: f32,
    pair: Option<BodyPair>,

    is_active: bool,
    solver_settings: SolverSettings,
    progress: SolverProgress,
}

impl Default for WheelBrake {
    fn default() -> Self {
        Self::new(
            DEFAULT_KINETIC_BRAKING_COEFFICIENT,
            DEFAULT_STATIC_BRAKING_COEFFICIENT,
            DEFAULT_ROLLING_COEFFICIENT,
        )
    }
}

impl WheelBrake {
    pub fn new(kinetic: f32, static_: f32, rolling: f32) -> Self {
        Self {
            kinetic_braking_coefficient: kinetic.max(0.0),
            static_braking_coefficient: static_.max(0.0),
            rolling_coefficient: rolling.max(0.0),
            static_friction_velocity_threshold: DEFAULT_STATIC_FRICTION_VELOCITY_THRESHOLD,
            is_braking: false,
            friction_blender: SharedBlender::default(),
            blended_coefficient: 0.0,
            accumulated_impulse: 0.0,
            jacobian: JacobianRow::default(),
            velocity_to_impulse: 0.0,
            pair: None,
            is_active: true,
            solver_settings: SolverSettings::default(),
            progress: SolverProgress::default(),
        }
    }

    pub fn with_blender(mut self, blender: impl FrictionBlender + 'static) -> Self {
        self.set_friction_blender(blender);
        self
    }

    pub fn kinetic_braking_coefficient(&self) -> f32 {
        self.kinetic_braking_coefficient
    }

    pub fn set_kinetic_braking_coefficient(&mut self, value: f32) {
        self.kinetic_braking_coefficient = value.max(0.0);
    }

    pub fn static_braking_coefficient(&self) -> f32 {
        self.static_braking_coefficient
    }

    pub fn set_static_braking_coefficient(&mut self, value: f32) {
        self.static_braking_coefficient = value.max(0.0);
    }

    /// Coefficient used while coasting. Not blended with the surface material.
    pub fn rolling_coefficient(&self) -> f32 {
        self.rolling_coefficient
    }

    pub fn set_rolling_coefficient(&mut self, value: f32) {
        self.rolling_coefficient = value.max(0.0);
    }

    pub fn static_friction_velocity_threshold(&self) -> f32 {
        self.static_friction_velocity_threshold
    }

    pub fn set_static_friction_velocity_threshold(&mut self, value: f32) {
        self.static_friction_velocity_threshold = value.max(0.0);
    }

    pub fn is_braking(&self) -> bool {
        self.is_braking
    }

    pub fn set_braking(&mut self, braking: bool) {
        self.is_braking = braking;
    }

    pub fn friction_blender(&self) -> &SharedBlender {
        &self.friction_blender
    }

    pub fn set_friction_blender(&mut self, blender: impl FrictionBlender + 'static) {
        self.friction_blender = SharedBlender::new(blender);
    }

    pub fn set_shared_blender(&mut self, blender: SharedBlender) {
        self.friction_blender = blender;
    }

    /// Coefficient selected by the last prestep.
    pub fn blended_coefficient(&self) -> f32 {
        self.blended_coefficient
    }

    pub fn accumulated_impulse(&self) -> f32 {
        self.accumulated_impulse
    }

    pub fn jacobian(&self) -> &JacobianRow {
        &self.jacobian
    }

    pub fn velocity_to_impulse(&self) -> f32 {
        self.velocity_to_impulse
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

    /// Velocity along the shared axis; the solver drives it toward zero.
    pub fn relative_velocity(&self, bodies: &BodySet) -> f32 {
        self.pair
            .as_ref()
            .map(|pair| self.jacobian.relative_velocity(bodies, pair))
            .unwrap_or(0.0)
    }

    /// Captures the bodies and the driving axis, then picks the friction coefficient.
    pub fn prestep(
        &mut self,
        bodies: &BodySet,
        pair: BodyPair,
        driving_axis: &ConstraintAxis,
        material: &InteractionProperties,
    ) {
        self.pair = Some(pair);
        self.jacobian = driving_axis.jacobian;
        self.velocity_to_impulse = driving_axis.velocity_to_impulse;
        self.progress.reset();

        self.blended_coefficient = if self.is_braking {
            braking_coefficient(
                &self.friction_blender,
                self.relative_velocity(bodies),
                self.static_friction_velocity_threshold,
                (self.kinetic_braking_coefficient, material.kinetic_friction),
                (self.static_braking_coefficient, material.static_friction),
            )
        } else {
            self.rolling_coefficient
        };
    }

    /// Warm start: reapplies the impulse accumulated during the previous step.
    pub fn exclusive_update(&self, bodies: &mut BodySet) {
        if let Some(pair) = &self.pair {
            self.jacobian
                .apply_impulse(bodies, pair, self.accumulated_impulse);
        }
    }

    /// One solver iteration. `suspension_impulse` is the normal load at this
    /// point of the solve. Returns the impulse actually applied.
    pub fn solve_iteration(&mut self, bodies: &mut BodySet, suspension_impulse: f32) -> f32 {
        let Some(pair) = self.pair else {
            return 0.0;
        };

        let lambda = self.jacobian.relative_velocity(bodies, &pair) * self.velocity_to_impulse;
        let max_force = (self.blended_coefficient * suspension_impulse).max(0.0);

        let previous = self.accumulated_impulse;
        self.accumulated_impulse = (previous + lambda).clamp(-max_force, max_force);
        let delta = self.accumulated_impulse - previous;

        self.jacobian.apply_impulse(bodies, &pair, delta);
        delta
    }

    /// Records the iteration for early-out bookkeeping.
    pub(crate) fn record_iteration(&mut self, impulse: f32) {
        self.progress.record(impulse, &self.solver_settings);
    }

    /// Forgets the warm-start impulse and the captured bodies.
    pub fn reset(&mut self) {
        self.accumulated_impulse = 0.0;
        self.pair = None;
    }

    pub(crate) fn clear_impulse(&mut self) {
        self.accumulated_impulse = 0.0;
    }
}

impl HasSolverSettings for WheelBrake {
    fn solver_settings(&self) -> &SolverSettings {
        &self.solver_settings
    }

    fn solver_settings_mut(&mut self) -> &mut SolverSettings {
        &mut self.solver_settings
    }
}

impl Motor for WheelBrake {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{rigidbody::RigidBody, types::MassProperties};
    use glam::Vec3;

    #[test]
    fn setters_clamp_negative_values() {
        let mut brake = WheelBrake::new(-1.0, -2.0, -3.0);
        assert_eq!(brake.kinetic_braking_coefficient(), 0.0);
        assert_eq!(brake.static_braking_coefficient(), 0.0);
        assert_eq!(brake.rolling_coefficient(), 0.0);

        brake.set_static_friction_velocity_threshold(-4.0);
        assert_eq!(brake.static_friction_velocity_threshold(), 0.0);
    }

    #[test]
    fn brake_without_prestep_is_inert() {
        let mut bodies = BodySet::new();
        let id = bodies.insert(RigidBody::new(Vec3::ZERO, MassProperties::default()));
        bodies.get_mut(id).unwrap().velocity.linear = Vec3::X;

        let mut brake = WheelBrake::default();
        brake.exclusive_update(&mut bodies);
        assert_eq!(brake.solve_iteration(&mut bodies, 10.0), 0.0);
        assert_eq!(bodies.get(id).unwrap().velocity.linear, Vec3::X);
        assert!(!brake.is_active_in_solver());
    }
}
