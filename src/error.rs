use std::error::Error;

use thiserror::Error;

use crate::state::{
    ladder::LadderError,
    state_machine::{InvalidTransition, SessionPhase},
};

/// Result alias for collaborator calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures reported by the search, guess and stats collaborators.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request never produced a usable response (transport, status, decode).
    #[error("{operation} request failed: {message}")]
    Network {
        /// Collaborator call that failed.
        operation: &'static str,
        /// Human readable context.
        message: String,
        /// Underlying failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The server answered but refused the request (bad status, not signed in).
    #[error("{operation} rejected: {message}")]
    Rejected {
        /// Collaborator call that was rejected.
        operation: &'static str,
        /// Server supplied reason.
        message: String,
    },
}

impl ServiceError {
    /// Construct a network error from any underlying failure.
    pub fn network(
        operation: &'static str,
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        ServiceError::Network {
            operation,
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Construct a rejection error.
    pub fn rejected(operation: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Rejected {
            operation,
            message: message.into(),
        }
    }
}

/// Errors returned by the round session controller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The action is not allowed in the current phase.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
    /// A previous guess is still waiting for the server.
    #[error("a guess submission is already in flight")]
    SubmissionInFlight,
    /// The guess could not be delivered; nothing was scored and it is safe to retry.
    #[error("guess submission failed; please try again")]
    Submission(#[source] ServiceError),
    /// The configured rung list is unusable.
    #[error(transparent)]
    Ladder(#[from] LadderError),
}

impl SessionError {
    /// Phase the session was in when an invalid transition was attempted.
    pub fn rejected_phase(&self) -> Option<SessionPhase> {
        match self {
            SessionError::InvalidTransition(invalid) => Some(invalid.from),
            _ => None,
        }
    }
}
