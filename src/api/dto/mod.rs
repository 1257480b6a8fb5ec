//! Data Transfer Objects for API requests and responses.
//!
//! - `envelope` - the success/data/error/message wrapper around every body
//! - `user` - user request/response DTOs

mod envelope;
mod user;

pub use envelope::{ApiResponse, ErrorEnvelope, MessageEnvelope, SuccessEnvelope};
pub use user::{CreateUserRequest, UpdateUserRequest, UserResponse};
