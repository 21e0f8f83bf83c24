//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of panicking
//! inside Criterion closures.

use campusnet_core::{CampusError, ValidationError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// The generator configuration cannot produce a campus.
    #[error("invalid synthetic campus configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: &'static str,
    },
    /// Generated records were rejected.
    #[error("generated records failed validation: {0}")]
    Validation(#[from] ValidationError),
    /// A planner failed while preparing benchmark input.
    #[error("planner failed: {0}")]
    Campus(#[from] CampusError),
}
