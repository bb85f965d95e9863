//! Runtime error types

use thiserror::Error;

/// Result type for script execution and emission
pub type RunResult<T> = Result<T, RunError>;

/// Execution error
#[derive(Debug, Error)]
pub enum RunError {
    /// A module transitively imported itself before its own execution
    /// completed. Carries the chain of module identifiers that closed
    /// the cycle.
    #[error("cycle in load graph: {0}")]
    LoadCycle(String),

    #[error("error executing module '{module}': {message}")]
    Exec { module: String, message: String },

    /// Replay of a failure already recorded against a module. The module
    /// is not re-executed.
    #[error("load of '{module}' previously failed: {message}")]
    Poisoned { module: String, message: String },

    #[error("integer {0} does not fit in 32 bits")]
    IntRange(String),

    #[error("type error: expected {expected}, got {actual}")]
    TypeError { expected: String, actual: String },

    #[error("encoding failed: {0}")]
    Encode(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(String),
}

impl RunError {
    /// Create a module execution error
    pub fn exec(module: impl Into<String>, err: impl std::fmt::Display) -> Self {
        RunError::Exec {
            module: module.into(),
            message: err.to_string(),
        }
    }

    /// Create a type error
    pub fn type_error(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        RunError::TypeError {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
