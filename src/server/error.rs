//! Mapping of errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::ErrorKind;

/// Error returned by HTTP handlers.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// A caller-facing error kind from the agent.
    Kind(ErrorKind),
    /// The request body could not be read as the expected JSON.
    InvalidRequest { status: StatusCode, message: String },
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn internal(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("Internal error: {}", msg);
        Self::Internal(msg)
    }

    pub fn invalid_request(status: StatusCode, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::debug!("Rejected request body: {}", msg);
        Self::InvalidRequest {
            status,
            message: msg,
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Not found: {}", msg);
        Self::NotFound(msg)
    }
}

impl From<ErrorKind> for ApiError {
    fn from(kind: ErrorKind) -> Self {
        Self::Kind(kind)
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: &ErrorKind) -> StatusCode {
    StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
    explanation: String,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ErrorBody<'a> {
    Kind(&'a ErrorKind),
    Other { kind: &'a str },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, explanation) = match &self {
            Self::Kind(kind) => (status_for(kind), ErrorBody::Kind(kind), kind.to_string()),
            Self::InvalidRequest { status, message } => (
                *status,
                ErrorBody::Other {
                    kind: "invalid_request",
                },
                message.clone(),
            ),
            Self::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody::Other { kind: "not_found" },
                msg.clone(),
            ),
            Self::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::Other { kind: "internal" },
                format!("Internal server error: {msg}"),
            ),
        };

        (status, Json(ErrorEnvelope { error, explanation })).into_response()
    }
}
