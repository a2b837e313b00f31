//! Utility helpers: generational storage and logging.

pub mod allocator;
pub mod logging;

pub use allocator::{Arena, EntityId};
pub use logging::ScopedTimer;
