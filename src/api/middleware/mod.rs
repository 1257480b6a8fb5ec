//! Middleware components for request processing.
//!
//! Request ID tracking, request logging and envelope rewriting for
//! framework-level errors.

mod error_handler;
mod logging;
mod request_id;

pub use error_handler::{error_to_status_code, failure_response, global_error_handler};
pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
