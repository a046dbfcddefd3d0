use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Classification of a raised failure, used to select a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Client input was rejected by business rules
    Business,

    /// Server-side failure
    Service,

    /// Failure owned by a dedicated resolver
    Custom,

    /// Anything else, including ad-hoc status errors
    Unclassified,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Business => write!(f, "BUSINESS"),
            Self::Service => write!(f, "SERVICE"),
            Self::Custom => write!(f, "CUSTOM"),
            Self::Unclassified => write!(f, "UNCLASSIFIED"),
        }
    }
}

/// An application error raised by a request handler.
///
/// Carries the message shown to the caller and, optionally, a status code
/// declared up front. A declared status is only used when the handler that
/// resolves the error does not pick one itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    declared_status: Option<StatusCode>,
}

impl AppError {
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        declared_status: Option<StatusCode>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            declared_status,
        }
    }

    pub fn business(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Business, message, None)
    }

    /// Service errors always declare 500
    pub fn service(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Service,
            message,
            Some(StatusCode::INTERNAL_SERVER_ERROR),
        )
    }

    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Custom, message, None)
    }

    /// Ad-hoc error carrying an explicit status, e.g. 418
    pub fn status(status: StatusCode, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unclassified, reason, Some(status))
    }

    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unclassified, message, None)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn declared_status(&self) -> Option<StatusCode> {
        self.declared_status
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<AppError>() {
            Ok(app_error) => app_error,
            Err(other) => AppError::unclassified(other.to_string()),
        }
    }
}

/// Classify an arbitrary error. Anything that is not an [`AppError`] is unclassified.
///
/// Entry point for errors that are not already an [`AppError`]; inside the
/// request path the kind is read straight from [`AppError::kind`].
pub fn classify(error: &(dyn std::error::Error + 'static)) -> ErrorKind {
    error
        .downcast_ref::<AppError>()
        .map(AppError::kind)
        .unwrap_or(ErrorKind::Unclassified)
}
