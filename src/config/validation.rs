//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (the loader handles syntactic)
//! - Enforce the host's payload ceiling on the body size limit
//! - Reject a non-positive forwarded-for depth before any request is handled
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system; a failure here
//!   refuses startup rather than guessing a safe default, since a wrong
//!   guess enables address/origin spoofing

use crate::config::schema::{BridgeConfig, MAX_BODY_SIZE_LIMIT};

/// A single semantic problem with a loaded configuration.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Configured limit exceeds what the host can deliver in one invocation.
    #[error("body size limit {limit} exceeds the {max} byte invocation ceiling")]
    BodySizeLimitTooLarge { limit: usize, max: usize },

    /// Depth must point at an actual entry in the proxy chain.
    #[error("forwarded-for depth must be a positive integer, got {0}")]
    NonPositiveDepth(u32),
}

/// Validate a loaded configuration, collecting every problem found.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.body_size_limit > MAX_BODY_SIZE_LIMIT {
        errors.push(ValidationError::BodySizeLimitTooLarge {
            limit: config.body_size_limit,
            max: MAX_BODY_SIZE_LIMIT,
        });
    }

    if config.xff_depth < 1 {
        errors.push(ValidationError::NonPositiveDepth(config.xff_depth));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
