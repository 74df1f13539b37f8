//! Scheduling machinery for periodic telemetry flushes.

pub mod delay;
pub mod dispatch;
pub mod task_timer;

// Re-exports
pub use self::{delay::*, dispatch::*, task_timer::*};
