//! Utils Module - Helper Functions & Shared Utilities
//!
//! Constants, unit conversion and telemetry shared across the crate.

pub mod constants;
pub mod telemetry;

pub use constants::*;
pub use telemetry::*;
