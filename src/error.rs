use hyper::StatusCode;
use thiserror::Error;

use crate::domain::RecordId;

/// Failures reported by a resource store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: RecordId },
    #[error("{kind} store unavailable: {reason}")]
    Unavailable { kind: &'static str, reason: String },
}

/// Every failure that can be reported to an HTTP caller.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("invalid {kind} id: {segment:?}")]
    InvalidId { kind: &'static str, segment: String },
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: RecordId },
    #[error("method {method} not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },
    #[error("route not found: {0}")]
    RouteNotFound(String),
    #[error("service unavailable: {0}")]
    StoreUnavailable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId { .. }
            | ApiError::InvalidBody(_)
            | ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } | ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => ApiError::NotFound { kind, id },
            unavailable @ StoreError::Unavailable { .. } => {
                ApiError::StoreUnavailable(unavailable.to_string())
            }
        }
    }
}
