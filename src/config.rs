//! Default tuning values for the solver and wheel constraints.

/// Default integration timestep (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Upper bound on solver passes per step, regardless of per-constraint policy.
pub const DEFAULT_SOLVER_ITERATIONS: u32 = 10;

/// Iterations a constraint must stay below its impulse margin before it leaves the solve.
pub const DEFAULT_MINIMUM_ITERATION_COUNT: u32 = 1;

/// Per-constraint iteration cap.
pub const DEFAULT_MAXIMUM_ITERATION_COUNT: u32 = 10;

/// Impulse magnitude below which an iteration counts as quiet.
pub const DEFAULT_MINIMUM_IMPULSE: f32 = 0.001;

/// Spring stiffness used by joints unless configured otherwise.
pub const DEFAULT_SPRING_STIFFNESS: f32 = 600_000.0;

/// Spring damping used by joints unless configured otherwise.
pub const DEFAULT_SPRING_DAMPING: f32 = 90_000.0;

pub const DEFAULT_ADVANCED_ERROR_REDUCTION_FACTOR: f32 = 0.1;

pub const DEFAULT_ADVANCED_SOFTNESS: f32 = 0.00001;

pub const DEFAULT_KINETIC_BRAKING_COEFFICIENT: f32 = 0.5;

pub const DEFAULT_STATIC_BRAKING_COEFFICIENT: f32 = 0.8;

pub const DEFAULT_ROLLING_COEFFICIENT: f32 = 0.02;

/// Speed (m/s) under which braking uses the static coefficient.
pub const DEFAULT_STATIC_FRICTION_VELOCITY_THRESHOLD: f32 = 5.0;

pub const DEFAULT_GRIP_FRICTION: f32 = 1.0;

/// Rest length of the wheel suspension (in meters).
pub const DEFAULT_SUSPENSION_REST_LENGTH: f32 = 0.5;
