//! Core functionality for the Flare telemetry client.

pub mod telemetry;

pub use telemetry::*;
