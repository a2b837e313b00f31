//! One-dimensional constraint rows between a vehicle body and an optional support.

use glam::Vec3;

use crate::{
    core::rigidbody::{BodySet, RigidBody},
    error::{Result, SolverError},
    utils::allocator::EntityId,
};

/// Bodies a constraint couples, resolved once per prestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyPair {
    pub vehicle: EntityId,
    /// `None` anchors the constraint to the world.
    pub support: Option<EntityId>,
    pub support_is_dynamic: bool,
}

impl BodyPair {
    /// Resolves the pair against the body set.
    ///
    /// A missing vehicle is an error; a support that no longer resolves is
    /// dropped and the constraint acts against the world.
    pub fn resolve(
        bodies: &BodySet,
        vehicle: EntityId,
        support: Option<EntityId>,
    ) -> Result<Self> {
        if !bodies.contains(vehicle) {
            return Err(SolverError::MissingBody(vehicle));
        }

        let support = support.filter(|&id| {
            let present = bodies.contains(id) && id != vehicle;
            if !present {
                log::warn!("support body {id:?} unavailable, anchoring to world");
            }
            present
        });
        let support_is_dynamic = support
            .and_then(|id| bodies.get(id))
            .is_some_and(RigidBody::is_dynamic);

        Ok(Self {
            vehicle,
            support,
            support_is_dynamic,
        })
    }
}

/// Maps a scalar impulse onto the velocities of a [`BodyPair`].
///
/// Body B's linear term is the negated body A linear term.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JacobianRow {
    pub linear_a: Vec3,
    pub angular_a: Vec3,
    pub angular_b: Vec3,
}

impl JacobianRow {
    /// Row for a direction `direction` acting at world point `point`.
    pub fn at_point(
        direction: Vec3,
        point: Vec3,
        vehicle: &RigidBody,
        support: Option<&RigidBody>,
    ) -> Self {
        let offset_a = point - vehicle.transform.position;
        let angular_b = support
            .map(|body| direction.cross(point - body.transform.position))
            .unwrap_or(Vec3::ZERO);
        Self {
            linear_a: direction,
            angular_a: offset_a.cross(direction),
            angular_b,
        }
    }

    /// `J M^-1 J^T` over the dynamic bodies of the row.
    pub fn inverse_effective_mass(
        &self,
        vehicle: &RigidBody,
        support: Option<&RigidBody>,
    ) -> f32 {
        let mut inverse = 0.0;
        if vehicle.is_dynamic() {
            inverse += self.linear_a.length_squared() * vehicle.inverse_mass
                + self.angular_a.dot(vehicle.inverse_inertia * self.angular_a);
        }
        if let Some(body) = support.filter(|body| body.is_dynamic()) {
            inverse += self.linear_a.length_squared() * body.inverse_mass
                + self.angular_b.dot(body.inverse_inertia * self.angular_b);
        }
        inverse
    }

    /// Constraint-space velocity. The support contributes whenever present.
    pub fn relative_velocity(&self, bodies: &BodySet, pair: &BodyPair) -> f32 {
        let mut velocity = 0.0;
        if let Some(vehicle) = bodies.get(pair.vehicle) {
            velocity += self.linear_a.dot(vehicle.velocity.linear)
                + self.angular_a.dot(vehicle.velocity.angular);
        }
        if let Some(support) = pair.support.and_then(|id| bodies.get(id)) {
            velocity += -self.linear_a.dot(support.velocity.linear)
                + self.angular_b.dot(support.velocity.angular);
        }
        velocity
    }

    /// Applies `impulse` along the row; the support only receives it when dynamic.
    pub fn apply_impulse(&self, bodies: &mut BodySet, pair: &BodyPair, impulse: f32) {
        let support = pair.support.filter(|_| pair.support_is_dynamic);
        match support {
            Some(support_id) => {
                if let Some((vehicle, support)) = bodies.get2_mut(pair.vehicle, support_id) {
                    self.apply_to_vehicle(vehicle, impulse);
                    self.apply_to_support(support, impulse);
                }
            }
            None => {
                if let Some(vehicle) = bodies.get_mut(pair.vehicle) {
                    self.apply_to_vehicle(vehicle, impulse);
                }
            }
        }
    }

    fn apply_to_vehicle(&self, body: &mut RigidBody, impulse: f32) {
        body.apply_linear_impulse(self.linear_a * impulse);
        body.apply_angular_impulse(self.angular_a * impulse);
    }

    fn apply_to_support(&self, body: &mut RigidBody, impulse: f32) {
        body.apply_linear_impulse(-self.linear_a * impulse);
        body.apply_angular_impulse(self.angular_b * impulse);
    }
}

/// A Jacobian row together with the effective mass along it.
///
/// Computed by the constraint that owns the axis and copied by constraints that
/// ride along it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConstraintAxis {
    pub jacobian: JacobianRow,
    pub inverse_effective_mass: f32,
    /// `-1 / inverse_effective_mass`; zero when no body on the row can move.
    pub velocity_to_impulse: f32,
}

impl ConstraintAxis {
    pub fn new(jacobian: JacobianRow, inverse_effective_mass: f32) -> Self {
        Self {
            jacobian,
            inverse_effective_mass,
            velocity_to_impulse: velocity_to_impulse(inverse_effective_mass),
        }
    }

    /// Builds the axis `direction` through `point` for the given pair.
    pub fn along(
        bodies: &BodySet,
        pair: &BodyPair,
        point: Vec3,
        direction: Vec3,
    ) -> Result<Self> {
        let vehicle = bodies
            .get(pair.vehicle)
            .ok_or(SolverError::MissingBody(pair.vehicle))?;
        let support = pair.support.and_then(|id| bodies.get(id));

        let jacobian = JacobianRow::at_point(direction, point, vehicle, support);
        let inverse_effective_mass = jacobian.inverse_effective_mass(vehicle, support);
        Ok(Self::new(jacobian, inverse_effective_mass))
    }

    /// Same axis, softened: the effective mass sees `softness` as extra compliance.
    pub fn with_softness(mut self, softness: f32) -> Self {
        self.velocity_to_impulse = velocity_to_impulse(self.inverse_effective_mass + softness);
        self
    }
}

fn velocity_to_impulse(inverse_effective_mass: f32) -> f32 {
    if inverse_effective_mass > f32::EPSILON {
        -1.0 / inverse_effective_mass
    } else {
        0.0
    }
}
