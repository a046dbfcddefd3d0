use axum::{
    middleware,
    routing::{get, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    self, health, test_custom_advice, test_custom_exception_resolver,
    test_default_controller_advice, test_exception_handler, test_response_status_exception,
    test_response_status_exception_resolver, AppState,
};
use super::middleware::{logging_middleware, resolve_exception, ExceptionContext};
use super::openapi::ApiDoc;
use crate::advice::CUSTOM_EXCEPTION_HANDLER_TAG;
use crate::metrics;
use crate::resolution::{HandlerRegistry, RequestScope};

/// Mount exception resolution on one route under the given scope
fn scoped(
    route: MethodRouter<AppState>,
    registry: &Arc<HandlerRegistry>,
    scope: RequestScope,
) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(
        ExceptionContext::new(registry.clone(), scope),
        resolve_exception,
    ))
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let registry = state.registry.clone();

    Router::new()
        // Health check
        .route("/health", get(health))
        // Exception handling examples
        .route(
            "/testExceptionHandler",
            scoped(
                get(test_exception_handler),
                &registry,
                RequestScope::new(handlers::EXCEPTION_HANDLER_ROUTE),
            ),
        )
        .route(
            "/testResponseStatusExceptionResolver",
            scoped(
                get(test_response_status_exception_resolver),
                &registry,
                RequestScope::new(handlers::RESPONSE_STATUS_RESOLVER_ROUTE),
            ),
        )
        .route(
            "/testCustomExceptionResolver",
            scoped(
                get(test_custom_exception_resolver),
                &registry,
                RequestScope::new(handlers::CUSTOM_RESOLVER_ROUTE),
            ),
        )
        .route(
            "/testDefaultControllerAdvice",
            scoped(
                get(test_default_controller_advice),
                &registry,
                RequestScope::new(handlers::DEFAULT_ADVICE_ROUTE),
            ),
        )
        .route(
            "/testCustomAdvice",
            scoped(
                get(test_custom_advice),
                &registry,
                RequestScope::new(handlers::CUSTOM_ADVICE_ROUTE)
                    .with_tag(CUSTOM_EXCEPTION_HANDLER_TAG),
            ),
        )
        .route(
            "/testResponseStatusException",
            scoped(
                get(test_response_status_exception),
                &registry,
                RequestScope::new(handlers::RESPONSE_STATUS_EXCEPTION_ROUTE),
            ),
        )
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(metrics::metrics_handler))
        // OpenAPI documentation
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Middleware order: logging -> metrics -> cors -> trace
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics::middleware::track_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
