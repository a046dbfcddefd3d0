//! Exception resolution: picks the one handler that turns an [`AppError`]
//! into a response, by scope precedence.

pub mod registry;

use axum::http::StatusCode;

use crate::errors::{AppError, BodyFormat};

pub use registry::{
    HandlerEntry, HandlerRegistry, HandlerRegistryBuilder, HandlerScope, KindMatcher,
    RegistryError, RequestScope,
};

/// Identity reported when no registered handler matched
pub const BUILTIN_HANDLER: &str = "builtin-default";

/// A registered function converting an error into a response.
///
/// Plain functions and closures taking `&AppError` work as responders.
pub trait ExceptionResponder: Send + Sync + 'static {
    fn respond(&self, error: &AppError) -> Resolution;
}

impl<F> ExceptionResponder for F
where
    F: Fn(&AppError) -> Resolution + Send + Sync + 'static,
{
    fn respond(&self, error: &AppError) -> Resolution {
        self(error)
    }
}

/// What a responder produced. `status: None` defers to the error's declared status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub status: Option<StatusCode>,
    pub message: String,
    pub format: BodyFormat,
}

impl Resolution {
    pub fn json(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            format: BodyFormat::Json,
        }
    }

    /// JSON body, status left to the error's declaration
    pub fn deferred(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            format: BodyFormat::Json,
        }
    }

    /// Settle the final status: the handler's own choice, else the declared
    /// status, else 500.
    pub fn finish(self, error: &AppError, handler: &'static str) -> ResolutionResult {
        let status = self
            .status
            .or(error.declared_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        ResolutionResult {
            status,
            message: self.message,
            format: self.format,
            handler,
        }
    }
}

/// The outcome of resolution, ready for [`crate::errors::emit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub status: StatusCode,
    pub message: String,
    pub format: BodyFormat,
    pub handler: &'static str,
}

/// Built-in default: declared status or 500, raw message, plain text
pub fn fallback(error: &AppError) -> ResolutionResult {
    Resolution {
        status: None,
        message: error.message().to_string(),
        format: BodyFormat::PlainText,
    }
    .finish(error, BUILTIN_HANDLER)
}

/// Where a request is in its lifecycle, reported in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
    Dispatched,
    Completed,
    Faulted,
    Resolved,
    Emitted,
}

impl DispatchPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dispatched => "dispatched",
            Self::Completed => "completed",
            Self::Faulted => "faulted",
            Self::Resolved => "resolved",
            Self::Emitted => "emitted",
        }
    }
}
