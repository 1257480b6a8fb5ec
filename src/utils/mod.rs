//! Request helpers shared by the HTTP handlers.

pub mod validate;
