//! Error types for shake-core.

use thiserror::Error;

/// Errors raised when records are malformed or mutated illegally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A record field failed boundary validation.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// Invalid status transition.
    #[error("invalid state transition: {from} -> {to}")]
    InvalidStateTransition {
        /// The current state.
        from: String,
        /// The attempted target state.
        to: String,
    },
}

impl CoreError {
    /// Creates a validation error for the given field.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Rejects currency values that are negative or not finite.
pub(crate) fn check_rate(field: &'static str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::validation(field, format!("must be finite, got {value}")));
    }
    if value < 0.0 {
        return Err(CoreError::validation(field, format!("must not be negative, got {value}")));
    }
    Ok(())
}
