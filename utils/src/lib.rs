//! Utility library for the Flare telemetry client.

pub mod concurrent;
