//! Error type shared by constraint presteps and the solver loop.

use crate::utils::allocator::EntityId;

/// Failures that abort a constraint's prestep.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum SolverError {
    /// Configuration error: the spring constants yield no finite error-reduction
    /// or softness (both zero, or out of `f32` range).
    #[error("spring constants do not produce finite error reduction and softness")]
    DegenerateSpring,
    /// The constraint's primary body is no longer part of the body set.
    #[error("body {0:?} is not present in the body set")]
    MissingBody(EntityId),
}

pub type Result<T> = std::result::Result<T, SolverError>;
