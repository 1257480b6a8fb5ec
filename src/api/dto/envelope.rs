//! Uniform response envelope.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use utoipa::ToSchema;

/// Every API body is one of these two shapes.
///
/// Serializes as `{ "success": bool, "data"?, "error"?, "message"? }` with
/// absent keys omitted, so the `success` flag is always derived from the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Success {
        data: Option<T>,
        message: Option<String>,
    },
    Failure {
        error: String,
    },
}

impl<T> ApiResponse<T> {
    /// Success carrying a payload and no message.
    pub fn data(data: T) -> Self {
        ApiResponse::Success {
            data: Some(data),
            message: None,
        }
    }

    /// Success carrying a payload and a human message.
    pub fn data_with_message(data: T, message: impl Into<String>) -> Self {
        ApiResponse::Success {
            data: Some(data),
            message: Some(message.into()),
        }
    }

    /// Success with a message only.
    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse::Success {
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ApiResponse::Failure {
            error: error.into(),
        }
    }

    #[cfg(test)]
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success { .. })
    }
}

impl<T: Serialize> Serialize for ApiResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ApiResponse::Success { data, message } => {
                let len = 1 + usize::from(data.is_some()) + usize::from(message.is_some());
                let mut state = serializer.serialize_struct("ApiResponse", len)?;
                state.serialize_field("success", &true)?;
                match data {
                    Some(data) => state.serialize_field("data", data)?,
                    None => state.skip_field("data")?,
                }
                match message {
                    Some(message) => state.serialize_field("message", message)?,
                    None => state.skip_field("message")?,
                }
                state.end()
            }
            ApiResponse::Failure { error } => {
                let mut state = serializer.serialize_struct("ApiResponse", 2)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
                state.end()
            }
        }
    }
}

/// OpenAPI shape of a successful [`ApiResponse`].
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct SuccessEnvelope<T> {
    #[schema(example = true)]
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

/// OpenAPI shape of a successful [`ApiResponse`] without payload.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct MessageEnvelope {
    #[schema(example = true)]
    success: bool,
    #[schema(example = "User deleted successfully")]
    message: String,
}

/// OpenAPI shape of a failed [`ApiResponse`].
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ErrorEnvelope {
    #[schema(example = false)]
    success: bool,
    #[schema(example = "User not found")]
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_only_omits_message_and_error() {
        let body = serde_json::to_value(ApiResponse::data(vec![1, 2])).unwrap();
        assert_eq!(body, json!({ "success": true, "data": [1, 2] }));
    }

    #[test]
    fn test_data_with_message() {
        let body =
            serde_json::to_value(ApiResponse::data_with_message("x", "User created successfully"))
                .unwrap();
        assert_eq!(
            body,
            json!({ "success": true, "data": "x", "message": "User created successfully" })
        );
    }

    #[test]
    fn test_message_only() {
        let body =
            serde_json::to_value(ApiResponse::<()>::message("User deleted successfully")).unwrap();
        assert_eq!(
            body,
            json!({ "success": true, "message": "User deleted successfully" })
        );
    }

    #[test]
    fn test_failure_sets_success_false() {
        let response = ApiResponse::<()>::failure("User not found");
        assert!(!response.is_success());
        let body = serde_json::to_value(response).unwrap();
        assert_eq!(body, json!({ "success": false, "error": "User not found" }));
    }
}
