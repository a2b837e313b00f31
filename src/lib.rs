//! Impulse Solver – velocity constraint solving for rigid-body engines.
//!
//! Constraints turn velocity and position errors into clamped impulses using
//! sequential impulses (projected Gauss-Seidel) with warm starting and
//! spring-tuned soft constraints. The wheel constraints (suspension, driving
//! motor, brake) are the reference 1-D constraints built on top.

pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod utils;

pub use glam::{Mat3, Quat, Vec3};

pub use crate::core::{
    rigidbody::{BodySet, RigidBody},
    types::{InteractionProperties, MassProperties, Material, MixingMode, Transform, Velocity},
};
pub use dynamics::{
    constraint::{Joint, JointSettings, Motor},
    friction::{FrictionBlender, SharedBlender},
    jacobian::{BodyPair, ConstraintAxis, JacobianRow},
    settings::{HasSolverSettings, SolverSettings},
    solver::{ConstraintSolver, SolverStepMetrics, SolverUpdateable},
    spring::{HasSpringSettings, SpringAdvancedSettings, SpringSettings},
    wheel::{Wheel, WheelBrake, WheelContact, WheelDrivingMotor, WheelSuspension},
};
pub use error::{Result, SolverError};
pub use utils::allocator::{Arena, EntityId};
