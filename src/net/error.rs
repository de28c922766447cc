//! Normalized API error taxonomy.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-field validation messages keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const MSG_UNAUTHORIZED: &str = "Session expired. Please login again.";
pub const MSG_FORBIDDEN: &str = "You don't have permission to perform this action.";
pub const MSG_NOT_FOUND: &str = "Resource not found.";
pub const MSG_VALIDATION: &str = "Validation error";
pub const MSG_SERVER: &str = "Server error. Please try again later.";
pub const MSG_NETWORK: &str = "Network error. Please check your connection.";
pub const MSG_TIMEOUT: &str = "Request timeout. Please try again.";
pub const MSG_REQUEST_FAILED: &str = "An error occurred";

/// Typed failure returned by every API call.
///
/// Each variant has already been surfaced to the user (where applicable)
/// by the time a caller sees it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// HTTP 401; the session has been cleared.
    #[error("{message}")]
    Unauthorized { message: String },

    /// HTTP 403.
    #[error("{message}")]
    Forbidden { message: String },

    /// HTTP 404.
    #[error("{message}")]
    NotFound { message: String },

    /// HTTP 422 with optional per-field messages.
    #[error("{message}")]
    ValidationFailed { message: String, field_errors: FieldErrors },

    /// HTTP 5xx.
    #[error("{message}")]
    ServerError { status: u16, message: String },

    /// The request never reached the server.
    #[error("{message}")]
    NetworkError { message: String },

    /// The request was aborted before a response arrived.
    #[error("{message}")]
    Timeout { message: String },

    /// Any other non-success outcome, including undecodable bodies.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },
}

impl ApiError {
    /// HTTP status, or 0 when no response was received.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::ValidationFailed { .. } => 422,
            Self::ServerError { status, .. } | Self::RequestFailed { status, .. } => *status,
            Self::NetworkError { .. } | Self::Timeout { .. } => 0,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::ValidationFailed { message, .. }
            | Self::ServerError { message, .. }
            | Self::NetworkError { message }
            | Self::Timeout { message }
            | Self::RequestFailed { message, .. } => message,
        }
    }

    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::ValidationFailed { field_errors, .. } => Some(field_errors),
            _ => None,
        }
    }

    /// Stable short code for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "unauthorized",
            Self::Forbidden { .. } => "forbidden",
            Self::NotFound { .. } => "not_found",
            Self::ValidationFailed { .. } => "validation_failed",
            Self::ServerError { .. } => "server_error",
            Self::NetworkError { .. } => "network_error",
            Self::Timeout { .. } => "timeout",
            Self::RequestFailed { .. } => "request_failed",
        }
    }

    /// Flatten into the `{statusCode, message, fieldErrors?}` wire shape.
    #[must_use]
    pub fn normalized(&self) -> NormalizedError {
        NormalizedError {
            status_code: self.status_code(),
            message: self.message().to_owned(),
            field_errors: self.field_errors().cloned(),
        }
    }
}

/// Serializable form of an [`ApiError`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedError {
    pub status_code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
}
