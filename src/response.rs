//! Rendering of dispatch outcomes as JSON responses.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;

/// A status code with its JSON body, independent of the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn ok<T: Serialize>(value: &T) -> Self {
        Self::json(StatusCode::OK, value)
    }

    pub fn created<T: Serialize>(value: &T) -> Self {
        Self::json(StatusCode::CREATED, value)
    }

    pub fn deleted() -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({ "message": "deleted" }),
        }
    }

    pub fn health() -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({ "status": "OK", "message": "API Running" }),
        }
    }

    pub fn error(err: &ApiError) -> Self {
        Self {
            status: err.status(),
            body: json!({ "error": err.to_string() }),
        }
    }

    fn json<T: Serialize>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self { status, body },
            // records are plain data; this only fires on a broken Serialize impl
            Err(e) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: json!({ "error": format!("failed to encode response: {e}") }),
            },
        }
    }

    pub fn into_hyper(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::from(self.body.to_string())));
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

impl From<Result<ApiResponse, ApiError>> for ApiResponse {
    fn from(result: Result<ApiResponse, ApiError>) -> Self {
        result.unwrap_or_else(|err| ApiResponse::error(&err))
    }
}
