//! Error types for shake-agent.

use thiserror::Error;

use shake_core::{CoreError, RequestId};

use crate::negotiation::SessionStatus;

/// Errors that can occur in engine operations.
///
/// Running out of rounds is not an error: `generate_counter` reports it as
/// `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A record failed validation or was mutated illegally.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No negotiation session exists for the request.
    #[error("negotiation session not found for request {0}")]
    SessionNotFound(RequestId),

    /// A negotiation session already exists for the request.
    #[error("negotiation session already exists for request {0}")]
    SessionExists(RequestId),

    /// The session has left the active state.
    #[error("negotiation session for request {request_id} is {status}")]
    SessionNotActive {
        /// Request under negotiation.
        request_id: RequestId,
        /// Current session status.
        status: SessionStatus,
    },

    /// Engine configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Returns true if the error is a missing session.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound(_))
    }
}
