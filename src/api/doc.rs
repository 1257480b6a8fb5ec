use utoipa::OpenApi;

pub const USER_TAG: &str = "User";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Arena Users",
        description = "User records for the arena: lookup, creation, partial update and deletion",
    ),
    components(schemas(crate::api::dto::ErrorEnvelope, crate::api::dto::MessageEnvelope)),
    tags(
        (name = USER_TAG, description = "User management endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
