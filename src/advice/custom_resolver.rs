use axum::http::StatusCode;

use crate::errors::{AppError, ErrorKind};
use crate::resolution::{ExceptionResponder, Resolution};

pub const HANDLER: &str = "custom-exception-resolver";

/// Stand-alone resolver object for [`ErrorKind::Custom`] errors.
///
/// The caller only sees a fixed message, never the error text.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomExceptionResolver;

impl ExceptionResponder for CustomExceptionResolver {
    fn respond(&self, error: &AppError) -> Resolution {
        match error.kind() {
            ErrorKind::Custom => {
                Resolution::json(StatusCode::BAD_REQUEST, "CustomException was handled")
            }
            _ => Resolution::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Another Exception was handled",
            ),
        }
    }
}
