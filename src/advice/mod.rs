//! Exception handlers used by the demo endpoints, and the registry that wires them up

pub mod custom_advice;
pub mod custom_resolver;
pub mod default_advice;
pub mod status_resolver;

use tracing::info;

use crate::api::handlers;
use crate::errors::ErrorKind;
use crate::resolution::{HandlerRegistry, HandlerScope, RegistryError};

pub use custom_advice::CUSTOM_EXCEPTION_HANDLER_TAG;
pub use custom_resolver::CustomExceptionResolver;

/// Build the handler registry served by the application.
///
/// Called once at startup; the result is immutable and shared by every request.
pub fn default_registry() -> Result<HandlerRegistry, RegistryError> {
    let mut builder = HandlerRegistry::builder();

    builder
        .register(
            HandlerScope::route(handlers::EXCEPTION_HANDLER_ROUTE),
            ErrorKind::Business,
            handlers::EXCEPTION_HANDLER_LOCAL,
            handlers::handle_business_exception,
        )?
        .register(
            HandlerScope::tagged(CUSTOM_EXCEPTION_HANDLER_TAG),
            ErrorKind::Business,
            custom_advice::HANDLER,
            custom_advice::handle_business_exception,
        )?
        .register(
            HandlerScope::Global,
            ErrorKind::Business,
            default_advice::HANDLER,
            default_advice::handle_business_exception,
        )?
        .register(
            HandlerScope::Global,
            ErrorKind::Service,
            status_resolver::HANDLER,
            status_resolver::resolve_declared_status,
        )?
        .register(
            HandlerScope::Global,
            ErrorKind::Custom,
            custom_resolver::HANDLER,
            CustomExceptionResolver,
        )?;

    let registry = builder.build();
    info!(handlers = registry.len(), "Exception handler registry built");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::resolution::{RequestScope, BUILTIN_HANDLER};
    use axum::http::StatusCode;

    #[test]
    fn test_default_registry_builds() {
        let registry = default_registry().unwrap();
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_business_error_routing() {
        let registry = default_registry().unwrap();
        let error = AppError::business("bad");

        let local = RequestScope::new(handlers::EXCEPTION_HANDLER_ROUTE);
        assert_eq!(
            registry.resolve(&error, &local).handler,
            handlers::EXCEPTION_HANDLER_LOCAL
        );

        let tagged = RequestScope::new("somewhere").with_tag(CUSTOM_EXCEPTION_HANDLER_TAG);
        assert_eq!(registry.resolve(&error, &tagged).handler, custom_advice::HANDLER);

        let plain = RequestScope::new("somewhere");
        let result = registry.resolve(&error, &plain);
        assert_eq!(result.handler, default_advice::HANDLER);
        assert_eq!(result.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_error_is_left_to_the_builtin_default() {
        let registry = default_registry().unwrap();
        let result = registry.resolve(
            &AppError::status(StatusCode::IM_A_TEAPOT, "teapot"),
            &RequestScope::new("somewhere"),
        );
        assert_eq!(result.handler, BUILTIN_HANDLER);
        assert_eq!(result.status, StatusCode::IM_A_TEAPOT);
    }
}
