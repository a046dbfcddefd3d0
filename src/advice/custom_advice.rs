use axum::http::StatusCode;

use crate::errors::AppError;
use crate::resolution::Resolution;

pub const HANDLER: &str = "custom-advice";

/// Routes carrying this tag are served by this advice before the global one
pub const CUSTOM_EXCEPTION_HANDLER_TAG: &str = "custom-exception-handler";

pub fn handle_business_exception(error: &AppError) -> Resolution {
    Resolution::json(StatusCode::BAD_REQUEST, error.message())
}
