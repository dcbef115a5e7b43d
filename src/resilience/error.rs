//! Breaker construction errors.

use thiserror::Error;

use crate::config::validation::{join_errors, ValidationError};

/// Errors that can occur while building a breaker.
///
/// Runtime operations never fail; only construction can.
#[derive(Debug, Error)]
pub enum BreakerError {
    /// Configuration failed semantic validation.
    #[error("invalid breaker configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ValidationError>),

    /// No Tokio runtime to run cooldown timers on.
    #[error("no Tokio runtime available; use with_handle from outside a runtime")]
    NoRuntime,
}

/// Result type for breaker construction.
pub type BreakerResult<T> = Result<T, BreakerError>;
