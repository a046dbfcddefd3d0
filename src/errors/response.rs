use axum::{
    http::{header::HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::kind::AppError;
use crate::resolution::{self, ResolutionResult};

/// Header naming the handler that produced an error response
pub const EXCEPTION_HANDLER_HEADER: HeaderName = HeaderName::from_static("x-exception-handler");

/// Body shared by every JSON endpoint, success or failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageBody {
    /// Human-readable message
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// How a resolved error is written on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// `{"message": "..."}`
    Json,
    /// Bare reason text, as the framework would send it
    PlainText,
}

/// Convert a resolution into the outgoing response
pub fn emit(result: ResolutionResult) -> Response {
    let mut response = match result.format {
        BodyFormat::Json => (result.status, Json(MessageBody::new(result.message))).into_response(),
        BodyFormat::PlainText => (result.status, result.message).into_response(),
    };

    if let Ok(value) = HeaderValue::from_str(result.handler) {
        response.headers_mut().insert(EXCEPTION_HANDLER_HEADER, value);
    }

    response
}

impl IntoResponse for ResolutionResult {
    fn into_response(self) -> Response {
        emit(self)
    }
}

/// Without a resolution layer an error still answers with the built-in default.
/// The error itself rides along in the response extensions so that
/// [`crate::api::middleware::resolve_exception`] can re-resolve it for the route.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = emit(resolution::fallback(&self));
        response.extensions_mut().insert(self);
        response
    }
}
