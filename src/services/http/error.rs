//! Error types shared by the HTTP backend implementation.

use reqwest::StatusCode;
use thiserror::Error;

use crate::{dao::storage::StorageError, error::ServiceError};

/// Convenient result alias returning [`HttpError`] failures.
pub type HttpResult<T> = Result<T, HttpError>;

/// Failures that can occur while talking to the game backend.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Required environment variable is missing.
    #[error("missing backend environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build backend HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent.
    #[error("failed to send backend request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The backend returned an unexpected status code.
    #[error("unexpected backend response status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// Response payload could not be parsed into JSON.
    #[error("failed to decode backend response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl HttpError {
    /// Convert into the collaborator-facing error for `operation`.
    pub fn into_service_error(self, operation: &'static str) -> ServiceError {
        match self {
            HttpError::RequestStatus { path, status } => {
                ServiceError::rejected(operation, format!("status {status} for `{path}`"))
            }
            other => ServiceError::network(operation, other.to_string(), other),
        }
    }
}

impl From<HttpError> for StorageError {
    fn from(err: HttpError) -> Self {
        StorageError::unavailable("progress backend request failed".into(), err)
    }
}
