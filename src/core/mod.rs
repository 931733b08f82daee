//! Core Module - Business Logic
//!
//! Chain detection, pattern statistics, dual risk scoring and the
//! pipeline that ties them to the adapters.

pub mod analyzer;
pub mod detector;
pub mod patterns;
pub mod risk_score;

pub use analyzer::*;
pub use risk_score::*;
