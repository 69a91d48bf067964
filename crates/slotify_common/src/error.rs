// --- File: crates/slotify_common/src/error.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Broad classes of API failure, each mapped onto one HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request payload failed validation
    Validation,
    /// Missing or unknown credentials
    Unauthorized,
    /// Authenticated, but not allowed to perform the operation
    Forbidden,
    /// Referenced resource does not exist
    NotFound,
    /// Operation lost against the current state of the resource
    Conflict,
    /// Anything the caller cannot fix
    Internal,
}

/// The error type handlers across the workspace ultimately return.
///
/// Next to the human-readable message it carries a stable machine-readable
/// `code` so clients can branch on the failure without parsing prose. The
/// status code expresses the kind, the code the precise reason.
#[derive(Error, Debug)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            code: "validation",
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Unauthorized,
            code: "unauthorized",
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Forbidden,
            code: "forbidden",
            message: message.into(),
        }
    }

    /// Not-found failure with a resource-specific code, e.g. `slot_not_found`.
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::NotFound,
            code,
            message: message.into(),
        }
    }

    /// Conflict failure with a reason-specific code, e.g. `slot_already_booked`.
    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Conflict,
            code,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Internal,
            code: "internal",
            message: message.into(),
        }
    }
}

/// A trait for converting errors to HTTP status codes.
///
/// This trait can be implemented by error types to provide a consistent way
/// to convert errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for ApiError {
    fn status_code(&self) -> u16 {
        match self.kind {
            ErrorKind::Validation => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal => 500,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Machine-readable code first, human text second
        let body = Json(json!({
            "error": self.code,
            "message": self.message,
        }));

        (status_code, body).into_response()
    }
}
