//! Router configuration for the API.

use axum::http::StatusCode;
use axum::response::Response;
use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    failure_response, global_error_handler, logging_middleware, request_id_middleware,
};
use crate::config::settings::ServerConfig;
use crate::state::AppState;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Last added runs first:
/// 1. Request ID: generates/propagates request IDs
/// 2. Logging: logs requests with request IDs
/// 3. Error envelope: rewrites framework-level error bodies
/// 4. CORS and compression, when enabled in `server`
///
/// # Routes
/// - `/api/users` - User CRUD operations and the liveness probe
/// - `/api-docs/openapi.json` and `/swagger-ui` - API documentation
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest(
            "/api/users",
            handlers::users::user_routes().merge(handlers::health::health_routes()),
        )
        .split_for_parts();

    let mut router = router
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, api))
        .fallback(not_found)
        .layer(middleware::from_fn(global_error_handler));

    if server.compression_enabled {
        router = router.layer(CompressionLayer::new());
    }
    if server.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

async fn not_found() -> Response {
    failure_response(StatusCode::NOT_FOUND, "The requested resource was not found")
}
