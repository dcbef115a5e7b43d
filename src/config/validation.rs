//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limit > 0, cooldown > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BreakerConfig → Result<(), Vec<ValidationError>>
//! - Runs before a breaker is constructed

use thiserror::Error;

use crate::config::schema::{BreakerConfig, WatchdogConfig};

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("breaker name must not be empty")]
    EmptyName,

    #[error("breaker '{0}': limit must be greater than zero")]
    ZeroLimit(String),

    #[error("breaker '{0}': cooldown_ms must be greater than zero")]
    ZeroCooldown(String),
}

/// Render validation errors as one comma-separated line.
pub fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate a breaker configuration.
pub fn validate_breaker(config: &BreakerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }
    if config.limit == 0 {
        errors.push(ValidationError::ZeroLimit(config.name.clone()));
    }
    if config.cooldown_ms == 0 {
        errors.push(ValidationError::ZeroCooldown(config.name.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the full watchdog document.
pub fn validate_config(config: &WatchdogConfig) -> Result<(), Vec<ValidationError>> {
    validate_breaker(&config.breaker)
}
