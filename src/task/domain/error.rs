//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskDomainError {
    /// An hours field was set to a negative value.
    #[error("{field} must not be negative, got {value}")]
    NegativeHours {
        /// Name of the rejected field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// An hours field was set to NaN or infinity.
    #[error("{field} must be a finite number")]
    NonFiniteHours {
        /// Name of the rejected field.
        field: &'static str,
    },

    /// A time entry end time precedes its start time.
    #[error("time entry cannot end before it starts")]
    EndBeforeStart,
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
