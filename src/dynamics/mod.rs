//! Constraint dynamics: spring tuning, constraint capabilities, wheel constraints and the solver loop.

pub mod constraint;
pub mod friction;
pub mod jacobian;
pub mod settings;
pub mod solver;
pub mod spring;
pub mod wheel;

pub use constraint::{compute_max_forces, Joint, JointSettings, Motor};
pub use friction::{FrictionBlender, SharedBlender};
pub use jacobian::{BodyPair, ConstraintAxis, JacobianRow};
pub use settings::{HasSolverSettings, SolverProgress, SolverSettings};
pub use solver::{ConstraintSolver, SolverStepMetrics, SolverUpdateable};
pub use spring::{HasSpringSettings, SpringAdvancedSettings, SpringSettings};
pub use wheel::{Wheel, WheelBrake, WheelContact, WheelDrivingMotor, WheelSuspension};
