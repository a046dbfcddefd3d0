use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::metrics::EXCEPTIONS_RESOLVED_TOTAL;
use crate::resolution::{DispatchPhase, HandlerRegistry, RequestScope};

/// Per-route state for [`resolve_exception`]: the shared registry plus the
/// scope the route was mounted under.
#[derive(Debug, Clone)]
pub struct ExceptionContext {
    pub registry: Arc<HandlerRegistry>,
    pub scope: RequestScope,
}

impl ExceptionContext {
    pub fn new(registry: Arc<HandlerRegistry>, scope: RequestScope) -> Self {
        Self { registry, scope }
    }
}

/// Middleware that turns an [`AppError`] returned by the route into the
/// response chosen by the handler registry.
pub async fn resolve_exception(
    State(ctx): State<ExceptionContext>,
    request: Request,
    next: Next,
) -> Response {
    debug!(route = %ctx.scope.route, phase = DispatchPhase::Dispatched.as_str());

    let mut response = next.run(request).await;

    let Some(error) = response.extensions_mut().remove::<AppError>() else {
        debug!(route = %ctx.scope.route, phase = DispatchPhase::Completed.as_str());
        return response;
    };

    debug!(
        route = %ctx.scope.route,
        kind = %error.kind(),
        phase = DispatchPhase::Faulted.as_str(),
        "Route raised an error"
    );

    let result = ctx.registry.resolve(&error, &ctx.scope);

    warn!(
        route = %ctx.scope.route,
        kind = %error.kind(),
        handler = result.handler,
        status = result.status.as_u16(),
        phase = DispatchPhase::Resolved.as_str(),
        "Exception resolved"
    );

    let kind = error.kind().to_string();
    EXCEPTIONS_RESOLVED_TOTAL
        .with_label_values(&[kind.as_str(), result.handler, result.status.as_str()])
        .inc();

    let response = result.into_response();
    debug!(route = %ctx.scope.route, phase = DispatchPhase::Emitted.as_str());
    response
}
