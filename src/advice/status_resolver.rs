use crate::errors::AppError;
use crate::resolution::Resolution;

pub const HANDLER: &str = "response-status-resolver";

/// Answers with whatever status the error declared, keeping the JSON body
pub fn resolve_declared_status(error: &AppError) -> Resolution {
    Resolution::deferred(error.message())
}
