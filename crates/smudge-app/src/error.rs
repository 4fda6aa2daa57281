//! Errors raised while loading or replaying a scene script.

use smudge_core::RegistryError;
use thiserror::Error;

/// Scene replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Step {step}: {source}")]
    Registry {
        step: usize,
        #[source]
        source: RegistryError,
    },
    #[error("Step {step}: {action} with no annotation dialog open")]
    Annotation { step: usize, action: &'static str },
}

/// Result type for replay operations.
pub type ReplayResult<T> = Result<T, ReplayError>;
