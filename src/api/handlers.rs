use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::errors::{AppError, MessageBody};
use crate::resolution::{HandlerRegistry, Resolution};

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub registry: Arc<HandlerRegistry>,
    pub instance_id: String,
}

pub type ApiResult = Result<Json<MessageBody>, AppError>;

// Route identities, matched against route-local handler scopes
pub const EXCEPTION_HANDLER_ROUTE: &str = "testExceptionHandler";
pub const RESPONSE_STATUS_RESOLVER_ROUTE: &str = "testResponseStatusExceptionResolver";
pub const CUSTOM_RESOLVER_ROUTE: &str = "testCustomExceptionResolver";
pub const DEFAULT_ADVICE_ROUTE: &str = "testDefaultControllerAdvice";
pub const CUSTOM_ADVICE_ROUTE: &str = "testCustomAdvice";
pub const RESPONSE_STATUS_EXCEPTION_ROUTE: &str = "testResponseStatusException";

/// Identity of the handler owned by `/testExceptionHandler`
pub const EXCEPTION_HANDLER_LOCAL: &str = "testExceptionHandler-local";

/// Failure toggle shared by the demo endpoints
#[derive(Debug, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
pub struct ExceptionParams {
    /// Raise the endpoint's error instead of answering normally
    pub exception: Option<bool>,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "exception-dispatch",
        "version": env!("CARGO_PKG_VERSION"),
        "instance_id": state.instance_id,
        "exception_handlers": state.registry.len(),
        "uptime_seconds": START_TIME.elapsed().as_secs(),
    }))
}

/// Business error answered by the route's own handler
#[utoipa::path(
    get,
    path = "/testExceptionHandler",
    tag = "examples",
    params(ExceptionParams),
    responses(
        (status = 200, description = "No error raised", body = MessageBody),
        (status = 400, description = "Handled by the route-local handler", body = MessageBody)
    )
)]
pub async fn test_exception_handler(Query(params): Query<ExceptionParams>) -> ApiResult {
    info!("testExceptionHandler request: exception={:?}", params.exception);

    if params.exception.unwrap_or(false) {
        return Err(AppError::business(
            "BusinessException in testExceptionExceptionHandler",
        ));
    }
    Ok(Json(MessageBody::new("Ok")))
}

/// Route-local handler for `/testExceptionHandler`
pub fn handle_business_exception(error: &AppError) -> Resolution {
    Resolution::json(StatusCode::BAD_REQUEST, error.message())
}

/// Service error answered through its declared status
#[utoipa::path(
    get,
    path = "/testResponseStatusExceptionResolver",
    tag = "examples",
    params(ExceptionParams),
    responses(
        (status = 200, description = "No error raised", body = MessageBody),
        (status = 500, description = "Declared status of the service error", body = MessageBody)
    )
)]
pub async fn test_response_status_exception_resolver(
    Query(params): Query<ExceptionParams>,
) -> ApiResult {
    info!(
        "testResponseStatusExceptionResolver request: exception={:?}",
        params.exception
    );

    if params.exception.unwrap_or(true) {
        return Err(AppError::service(
            "ServiceException in method testResponseStatusExceptionResolver",
        ));
    }
    Ok(Json(MessageBody::new("Ok")))
}

/// Custom error answered by the dedicated resolver
#[utoipa::path(
    get,
    path = "/testCustomExceptionResolver",
    tag = "examples",
    params(ExceptionParams),
    responses(
        (status = 200, description = "No error raised", body = MessageBody),
        (status = 400, description = "Handled by the custom resolver", body = MessageBody)
    )
)]
pub async fn test_custom_exception_resolver(Query(params): Query<ExceptionParams>) -> ApiResult {
    info!(
        "testCustomExceptionResolver request: exception={:?}",
        params.exception
    );

    if params.exception.unwrap_or(false) {
        return Err(AppError::custom(
            "CustomException in testCustomHandlerExceptionResolver",
        ));
    }
    Ok(Json(MessageBody::new("Ok")))
}

/// Business error answered by the global default advice
#[utoipa::path(
    get,
    path = "/testDefaultControllerAdvice",
    tag = "examples",
    params(ExceptionParams),
    responses(
        (status = 200, description = "No error raised", body = MessageBody),
        (status = 400, description = "Handled by the default advice", body = MessageBody)
    )
)]
pub async fn test_default_controller_advice(Query(params): Query<ExceptionParams>) -> ApiResult {
    info!(
        "testDefaultControllerAdvice request: exception={:?}",
        params.exception
    );

    if params.exception.unwrap_or(false) {
        return Err(AppError::business(
            "BusinessException in testDefaultControllerAdvice",
        ));
    }
    Ok(Json(MessageBody::new("All Ok")))
}

/// Business error answered by the tag-scoped advice
#[utoipa::path(
    get,
    path = "/testCustomAdvice",
    tag = "examples",
    params(ExceptionParams),
    responses(
        (status = 200, description = "No error raised", body = MessageBody),
        (status = 400, description = "Handled by the tag-scoped advice", body = MessageBody)
    )
)]
pub async fn test_custom_advice(Query(params): Query<ExceptionParams>) -> ApiResult {
    info!("testCustomAdvice request: exception={:?}", params.exception);

    if params.exception.unwrap_or(false) {
        return Err(AppError::business(
            "BusinessException in testCustomControllerAdvice",
        ));
    }
    Ok(Json(MessageBody::new("All Ok")))
}

/// Ad-hoc status error, left to the built-in default
#[utoipa::path(
    get,
    path = "/testResponseStatusException",
    tag = "examples",
    params(ExceptionParams),
    responses(
        (status = 200, description = "No error raised", body = MessageBody),
        (status = 418, description = "Reason text of the status error", body = String, content_type = "text/plain")
    )
)]
pub async fn test_response_status_exception(Query(params): Query<ExceptionParams>) -> ApiResult {
    info!(
        "testResponseStatusException request: exception={:?}",
        params.exception
    );

    if params.exception.unwrap_or(false) {
        return Err(AppError::status(
            StatusCode::IM_A_TEAPOT,
            "ResponseStatusException in testResponseStatusException",
        ));
    }
    Ok(Json(MessageBody::new("All Ok!!!")))
}
