//! Body state and value types consumed by the constraint solver.

pub mod rigidbody;
pub mod types;

pub use rigidbody::{BodySet, RigidBody};
pub use types::{InteractionProperties, MassProperties, Material, MixingMode, Transform, Velocity};
