pub mod exception;
pub mod logging;

pub use exception::{resolve_exception, ExceptionContext};
pub use logging::logging_middleware;
