//! Error body and status mapping for HTTP responses.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{debug, error};
use opencontact_core::{ErrorKind, ServiceError};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Error returned by every handler.
///
/// Serialized as `{ "error": code, "message": text }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
}

impl ApiError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.status.as_u16(), self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                "event=http_error module=api status=error http_status={} code={} error={}",
                self.status.as_u16(),
                self.code,
                self.message
            );
        } else {
            debug!(
                "event=http_error module=api status=rejected http_status={} code={}",
                self.status.as_u16(),
                self.code
            );
        }

        let body = ErrorBody {
            error: self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        let status = match value.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => {
                return Self::internal(value.to_string());
            }
        };
        let code = match &value {
            ServiceError::AgendaNotFound(_) => "AGENDA_NOT_FOUND",
            ServiceError::ContactNotFound(_) => "CONTACT_NOT_FOUND",
            ServiceError::NameConflict(_) => "NAME_CONFLICT",
            ServiceError::PhoneConflict { .. } => "PHONE_CONFLICT",
            ServiceError::DependencyConflict(_) => "DEPENDENCY_CONFLICT",
            _ => "VALIDATION_ERROR",
        };

        Self {
            status,
            code,
            message: value.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::bad_request("INVALID_BODY", value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        Self::bad_request("INVALID_PATH", value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::bad_request("INVALID_QUERY", value.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::internal(format!("request task failed: {value}"))
    }
}
