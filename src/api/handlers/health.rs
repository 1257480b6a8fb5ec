//! Liveness endpoint.

use axum::Json;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ApiResponse, SuccessEnvelope};
use crate::state::AppState;

/// Mounted under `/api/users`, next to the user routes.
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(health_check))
}

/// GET /api/users/health/check - Liveness probe
///
/// Static answer; does not touch storage.
#[utoipa::path(
    get,
    path = "/health/check",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is running", body = SuccessEnvelope<String>)
    )
)]
async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::data_with_message(
        "User Service is running",
        "Health check passed",
    ))
}
