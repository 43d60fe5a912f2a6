//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (clap handles syntactic)
//! - Reject blank linked container names (e.g. `ECSWRAP_LINKED_CONTAINERS=a,,b`)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WrapperConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::WrapperConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("linked container name at position {0} is empty")]
    EmptyLinkedContainer(usize),
}

pub fn validate_config(config: &WrapperConfig) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = config
        .linked_containers
        .iter()
        .enumerate()
        .filter(|(_, name)| name.trim().is_empty())
        .map(|(i, _)| ValidationError::EmptyLinkedContainer(i))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
