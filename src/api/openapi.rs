use utoipa::OpenApi;

use crate::api::handlers::ExceptionParams;
use crate::errors::{ErrorKind, MessageBody};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Exception Dispatch",
        version = "0.1.0",
        description = "Demonstrates how raised application errors are resolved to HTTP responses: route-local handlers, tag-scoped advice, global advice, resolver objects and declared status codes.",
        contact(
            name = "Exception Dispatch API",
        )
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::test_exception_handler,
        crate::api::handlers::test_response_status_exception_resolver,
        crate::api::handlers::test_custom_exception_resolver,
        crate::api::handlers::test_default_controller_advice,
        crate::api::handlers::test_custom_advice,
        crate::api::handlers::test_response_status_exception,
    ),
    components(
        schemas(
            MessageBody,
            ExceptionParams,
            ErrorKind,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "examples", description = "Endpoints that optionally raise an error"),
    )
)]
pub struct ApiDoc;
