//! Error types for the timetable solver

use thiserror::Error;

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler errors.
///
/// Capacity shortfalls, unplaceable courses and overlaps are not errors; they
/// are reported as diagnostics on the result.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Input records violate a precondition of allocation
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Configuration value could not be used
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    /// The ILP backend did not produce a solution
    #[error("Solver failed: {reason}")]
    SolverFailed { reason: String },

    #[error("IO error during '{operation}': {reason}")]
    Io { operation: String, reason: String },

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl From<serde_json::Error> for SchedulerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for SchedulerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            operation: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl SchedulerError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn solver_failed(reason: impl Into<String>) -> Self {
        Self::SolverFailed {
            reason: reason.into(),
        }
    }

    pub fn io_error(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Io {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Whether the caller sent bad data, as opposed to a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::Serialization { .. })
    }
}
