use crate::error::DatabaseErrorConverter;
use diesel_async::pooled_connection::PoolError;
use thiserror::Error;

/// Application-wide error type that represents all possible errors in the system.
///
/// Business faults (`NotFound`, `Duplicate`, `BadRequest`) carry enough
/// structure to render a client-facing message; infrastructure faults keep
/// their source chain for logging and are sanitized before leaving the process.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Duplicate entry error for uniqueness violations
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Not-found fault for a user looked up by id.
    pub fn user_not_found(id: &str) -> Self {
        AppError::NotFound {
            entity: "user".to_string(),
            field: "id".to_string(),
            value: id.to_string(),
        }
    }

    /// Duplicate fault for a user field that must be unique.
    pub fn duplicate_user(field: &str, value: &str) -> Self {
        AppError::Duplicate {
            entity: "user".to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Message that is safe to hand to API clients.
    ///
    /// `NotFound` renders as `"User not found"`, `Duplicate` as
    /// `"Email already exists"`. Infrastructure errors never expose their source.
    pub fn client_message(&self) -> String {
        match self {
            AppError::NotFound { entity, .. } => format!("{} not found", capitalize(entity)),
            AppError::Duplicate { field, .. } => format!("{} already exists", capitalize(field)),
            AppError::BadRequest { message } => message.clone(),
            AppError::Database { .. } => "A database error occurred".to_string(),
            AppError::Configuration { .. } => "Service is misconfigured".to_string(),
            AppError::ConnectionPool { .. } => "Database connection unavailable".to_string(),
            AppError::Internal { .. } => "An internal error occurred".to_string(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl From<bb8::RunError<PoolError>> for AppError {
    fn from(error: bb8::RunError<PoolError>) -> Self {
        AppError::ConnectionPool {
            source: anyhow::anyhow!("{}", error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
