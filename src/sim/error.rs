//! Construction-time precondition failures
//!
//! Ticking never fails; these only come out of constructors and the level
//! generator.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Entity size is zero, negative or not finite
    #[error("invalid {entity} size {w}x{h}")]
    InvalidSize {
        entity: &'static str,
        w: f32,
        h: f32,
    },

    /// Difficulty profile cannot produce a solvable level
    #[error("invalid difficulty profile: {reason}")]
    InvalidProfile { reason: String },

    /// Generation finished without a single platform
    #[error("generated level of width {width} has no platforms")]
    DegenerateLevel { width: f32 },
}
