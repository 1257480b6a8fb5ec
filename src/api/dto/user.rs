//! User-related DTOs for API requests and responses.

use crate::models::{User, UserPatch};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a new user.
///
/// `email` and `username` are required; everything else may be omitted or null.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Used as the record id when present; a UUID is assigned otherwise
    pub id: Option<String>,
    #[schema(format = "email", example = "a@x.com")]
    pub email: String,
    #[schema(example = "a")]
    pub username: String,
    pub elo: Option<i32>,
    pub tier: Option<String>,
    pub total_matches: Option<i32>,
    pub wins: Option<i32>,
    pub avatar: Option<String>,
}

impl CreateUserRequest {
    /// Converts the request into the candidate record handed to the service.
    pub fn into_user(self) -> User {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        User {
            id,
            email: self.email,
            username: self.username,
            elo: self.elo,
            tier: self.tier,
            total_matches: self.total_matches,
            wins: self.wins,
            avatar: self.avatar,
        }
    }
}

/// Request body for a partial update. Null and missing fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// Accepted and ignored
    pub id: Option<String>,
    /// Accepted and ignored; email cannot be changed
    pub email: Option<String>,
    pub username: Option<String>,
    #[schema(example = 1500)]
    pub elo: Option<i32>,
    pub tier: Option<String>,
    pub total_matches: Option<i32>,
    pub wins: Option<i32>,
    pub avatar: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_patch(self) -> UserPatch {
        UserPatch {
            username: self.username,
            elo: self.elo,
            tier: self.tier,
            total_matches: self.total_matches,
            wins: self.wins,
            avatar: self.avatar,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Transfer projection of a stored user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub elo: Option<i32>,
    pub tier: Option<String>,
    pub total_matches: Option<i32>,
    pub wins: Option<i32>,
    pub avatar: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            elo: user.elo,
            tier: user.tier,
            total_matches: user.total_matches,
            wins: user.wins,
            avatar: user.avatar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_camel_case_and_optional_fields() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"email":"a@x.com","username":"a","totalMatches":3,"avatar":null}"#,
        )
        .unwrap();

        let user = request.into_user();
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.total_matches, Some(3));
        assert_eq!(user.avatar, None);
        assert!(Uuid::parse_str(&user.id).is_ok());
    }

    #[test]
    fn test_create_request_keeps_supplied_id() {
        let request: CreateUserRequest =
            serde_json::from_str(r#"{"id":"player-7","email":"b@x.com","username":"b"}"#).unwrap();
        assert_eq!(request.into_user().id, "player-7");
    }

    #[test]
    fn test_create_request_requires_email_and_username() {
        assert!(serde_json::from_str::<CreateUserRequest>(r#"{"username":"a"}"#).is_err());
        assert!(serde_json::from_str::<CreateUserRequest>(r#"{"email":"a@x.com"}"#).is_err());
    }

    #[test]
    fn test_update_request_drops_id_and_email() {
        let request: UpdateUserRequest =
            serde_json::from_str(r#"{"id":"other","email":"new@x.com","elo":1500,"tier":null}"#)
                .unwrap();
        let patch = request.into_patch();
        assert_eq!(
            patch,
            UserPatch {
                elo: Some(1500),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_user_response_serializes_camel_case() {
        let response = UserResponse::from(User {
            id: "u".to_string(),
            email: "e@x.com".to_string(),
            username: "n".to_string(),
            elo: Some(1200),
            tier: None,
            total_matches: Some(10),
            wins: Some(4),
            avatar: None,
        });
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["totalMatches"], 10);
        assert_eq!(value["wins"], 4);
        assert!(value["tier"].is_null());
    }
}
