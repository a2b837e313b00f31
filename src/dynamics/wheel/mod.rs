//! Wheel constraints: suspension, driving motor and brake, solved as one group.

pub mod brake;
pub mod driving_motor;
pub mod suspension;

pub use brake::WheelBrake;
pub use driving_motor::WheelDrivingMotor;
pub use suspension::WheelSuspension;

use glam::Vec3;

use crate::{
    core::{rigidbody::BodySet, types::InteractionProperties},
    dynamics::{jacobian::BodyPair, solver::SolverUpdateable},
    error::Result,
    utils::allocator::EntityId,
};

/// Ground contact of a wheel, produced by the surrounding collision queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelContact {
    /// Body the wheel rests on; `None` for world geometry.
    pub support: Option<EntityId>,
    pub point: Vec3,
    /// Contact normal, pointing from the support toward the vehicle.
    pub normal: Vec3,
    /// Rolling direction of the wheel; projected onto the contact plane.
    pub forward: Vec3,
    /// Current distance between the suspension mount and the contact.
    pub suspension_length: f32,
    pub material: InteractionProperties,
}

/// One wheel of a vehicle body.
#[derive(Debug, Clone)]
pub struct Wheel {
    vehicle: EntityId,
    contact: Option<WheelContact>,
    suspension: WheelSuspension,
    driving_motor: WheelDrivingMotor,
    brake: WheelBrake,
}

impl Wheel {
    pub fn new(vehicle: EntityId) -> Self {
        Self::with_constraints(
            vehicle,
            WheelSuspension::default(),
            WheelDrivingMotor::default(),
            WheelBrake::default(),
        )
    }

    pub fn with_constraints(
        vehicle: EntityId,
        suspension: WheelSuspension,
        driving_motor: WheelDrivingMotor,
        brake: WheelBrake,
    ) -> Self {
        Self {
            vehicle,
            contact: None,
            suspension,
            driving_motor,
            brake,
        }
    }

    pub fn vehicle(&self) -> EntityId {
        self.vehicle
    }

    pub fn contact(&self) -> Option<&WheelContact> {
        self.contact.as_ref()
    }

    /// Updates the ground contact; `None` leaves the wheel airborne.
    pub fn set_contact(&mut self, contact: Option<WheelContact>) {
        self.contact = contact;
    }

    pub fn suspension(&self) -> &WheelSuspension {
        &self.suspension
    }

    pub fn suspension_mut(&mut self) -> &mut WheelSuspension {
        &mut self.suspension
    }

    pub fn driving_motor(&self) -> &WheelDrivingMotor {
        &self.driving_motor
    }

    pub fn driving_motor_mut(&mut self) -> &mut WheelDrivingMotor {
        &mut self.driving_motor
    }

    pub fn brake(&self) -> &WheelBrake {
        &self.brake
    }

    pub fn brake_mut(&mut self) -> &mut WheelBrake {
        &mut self.brake
    }

    fn leave_ground(&mut self) {
        self.suspension.reset();
        self.driving_motor.reset();
        self.brake.reset();
    }
}

impl SolverUpdateable for Wheel {
    fn update(&mut self, dt: f32, bodies: &BodySet) -> Result<()> {
        let Some(contact) = self.contact else {
            self.leave_ground();
            return Ok(());
        };

        let pair = BodyPair::resolve(bodies, self.vehicle, contact.support)?;
        self.suspension.prestep(dt, bodies, pair, &contact)?;
        self.driving_motor.prestep(dt, bodies, pair, &contact)?;
        self.brake
            .prestep(bodies, pair, self.driving_motor.axis(), &contact.material);

        let driving = self.driving_motor.target_speed() != 0.0 && !self.brake.is_braking();
        self.driving_motor.set_active(driving);
        self.brake.set_active(!driving);
        if driving {
            self.brake.clear_impulse();
        } else {
            self.driving_motor.clear_impulse();
        }
        Ok(())
    }

    fn exclusive_update(&mut self, bodies: &mut BodySet) {
        if self.suspension.is_active_in_solver() {
            self.suspension.exclusive_update(bodies);
        }
        if self.driving_motor.is_active_in_solver() {
            self.driving_motor.exclusive_update(bodies);
        }
        if self.brake.is_active_in_solver() {
            self.brake.exclusive_update(bodies);
        }
    }

    fn solve_iteration(&mut self, bodies: &mut BodySet) -> f32 {
        let mut impulse = 0.0;

        if self.suspension.is_active_in_solver() {
            let delta = self.suspension.solve_iteration(bodies);
            self.suspension.record_iteration(delta);
            impulse += delta.abs();
        }

        let load = self.suspension.accumulated_impulse();
        if self.driving_motor.is_active_in_solver() {
            let delta = self.driving_motor.solve_iteration(bodies, load);
            self.driving_motor.record_iteration(delta);
            impulse += delta.abs();
        }
        if self.brake.is_active_in_solver() {
            let delta = self.brake.solve_iteration(bodies, load);
            self.brake.record_iteration(delta);
            impulse += delta.abs();
        }

        impulse
    }

    fn is_active_in_solver(&self) -> bool {
        self.suspension.is_active_in_solver()
            || self.driving_motor.is_active_in_solver()
            || self.brake.is_active_in_solver()
    }
}
