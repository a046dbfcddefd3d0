use axum::http::StatusCode;

use crate::errors::AppError;
use crate::resolution::Resolution;

pub const HANDLER: &str = "default-advice";

/// Application-wide answer to business errors
pub fn handle_business_exception(error: &AppError) -> Resolution {
    Resolution::json(StatusCode::BAD_REQUEST, error.message())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_with_message() {
        let resolution = handle_business_exception(&AppError::business("invalid order"));
        assert_eq!(resolution.status, Some(StatusCode::BAD_REQUEST));
        assert_eq!(resolution.message, "invalid order");
    }
}
