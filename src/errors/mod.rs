//! Error taxonomy and wire responses

pub mod kind;
pub mod response;

pub use kind::{classify, AppError, ErrorKind};
pub use response::{emit, BodyFormat, MessageBody, EXCEPTION_HANDLER_HEADER};
