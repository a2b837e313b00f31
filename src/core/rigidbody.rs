use crate::utils::allocator::Arena;

use super::types::{MassProperties, Transform, Velocity};
use glam::{Mat3, Vec3};

/// Storage for every body the solver can touch.
pub type BodySet = Arena<RigidBody>;

/// Rigid body state as seen by the velocity solver.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub transform: Transform,
    pub velocity: Velocity,
    pub mass_properties: MassProperties,
    pub is_static: bool,
    pub is_kinematic: bool,
    pub inverse_mass: f32,
    /// World-space inverse inertia tensor.
    pub inverse_inertia: Mat3,
}

impl Default for RigidBody {
    fn default() -> Self {
        let mut body = Self {
            transform: Transform::default(),
            velocity: Velocity::default(),
            mass_properties: MassProperties::default(),
            is_static: false,
            is_kinematic: false,
            inverse_mass: 1.0,
            inverse_inertia: Mat3::IDENTITY,
        };
        body.recompute_inverses();
        body
    }
}

impl RigidBody {
    /// Dynamic body at `position` with the given mass and inertia.
    pub fn new(position: Vec3, mass_properties: MassProperties) -> Self {
        let mut body = Self {
            transform: Transform::from_position(position),
            mass_properties,
            ..Self::default()
        };
        body.recompute_inverses();
        body
    }

    /// Immovable body (ground, walls). Impulses never change its velocity.
    pub fn new_static(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            is_static: true,
            inverse_mass: 0.0,
            inverse_inertia: Mat3::ZERO,
            ..Self::default()
        }
    }

    /// Body driven by user velocity: it moves, pushes others, but ignores impulses.
    pub fn new_kinematic(position: Vec3, velocity: Velocity) -> Self {
        Self {
            transform: Transform::from_position(position),
            velocity,
            is_kinematic: true,
            inverse_mass: 0.0,
            inverse_inertia: Mat3::ZERO,
            ..Self::default()
        }
    }

    pub fn is_dynamic(&self) -> bool {
        !self.is_static && !self.is_kinematic
    }

    pub fn apply_linear_impulse(&mut self, impulse: Vec3) {
        if !self.is_dynamic() {
            return;
        }
        self.velocity.linear += impulse * self.inverse_mass;
    }

    pub fn apply_angular_impulse(&mut self, impulse: Vec3) {
        if !self.is_dynamic() {
            return;
        }
        self.velocity.angular += self.inverse_inertia * impulse;
    }

    pub fn set_mass_properties(&mut self, props: MassProperties) {
        self.mass_properties = props;
        self.recompute_inverses();
    }

    fn recompute_inverses(&mut self) {
        self.inverse_mass = if self.mass_properties.mass.abs() < f32::EPSILON {
            0.0
        } else {
            1.0 / self.mass_properties.mass
        };
        let inverse_inertia = self.mass_properties.inertia.inverse();
        self.inverse_inertia = if inverse_inertia.is_finite() {
            inverse_inertia
        } else {
            Mat3::ZERO
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulses_scale_by_inverse_mass_and_inertia() {
        let mut body = RigidBody::new(
            Vec3::ZERO,
            MassProperties {
                mass: 2.0,
                inertia: Mat3::from_diagonal(Vec3::splat(4.0)),
            },
        );

        body.apply_linear_impulse(Vec3::new(1.0, 0.0, 0.0));
        body.apply_angular_impulse(Vec3::new(0.0, 2.0, 0.0));

        assert!((body.velocity.linear.x - 0.5).abs() < 1e-6);
        assert!((body.velocity.angular.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn mass_changes_refresh_inverses() {
        let mut body = RigidBody::new(Vec3::ZERO, MassProperties::default());
        body.set_mass_properties(MassProperties {
            mass: 4.0,
            inertia: Mat3::from_diagonal(Vec3::new(2.0, 0.0, 1.0)),
        });

        assert_eq!(body.inverse_mass, 0.25);
        assert_eq!(body.inverse_inertia, Mat3::ZERO);

        body.set_mass_properties(MassProperties {
            mass: 0.0,
            inertia: Mat3::IDENTITY,
        });
        assert_eq!(body.inverse_mass, 0.0);
        assert_eq!(body.inverse_inertia, Mat3::IDENTITY);
    }

    #[test]
    fn non_dynamic_bodies_ignore_impulses() {
        let mut ground = RigidBody::new_static(Vec3::ZERO);
        ground.apply_linear_impulse(Vec3::ONE);
        assert_eq!(ground.velocity.linear, Vec3::ZERO);

        let mut platform = RigidBody::new_kinematic(
            Vec3::ZERO,
            Velocity::new(Vec3::X, Vec3::ZERO),
        );
        platform.apply_linear_impulse(Vec3::ONE);
        platform.apply_angular_impulse(Vec3::ONE);
        assert_eq!(platform.velocity.linear, Vec3::X);
        assert_eq!(platform.velocity.angular, Vec3::ZERO);
    }
}
