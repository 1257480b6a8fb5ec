//! User CRUD request handlers.
//!
//! Every handler answers with an [`ApiResponse`] envelope. Lookups that find
//! nothing answer 404 with a fixed message; service faults are rendered by
//! the [`AppError`](crate::error::AppError) response mapping.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::USER_TAG;
use crate::api::dto::{
    ApiResponse, CreateUserRequest, ErrorEnvelope, MessageEnvelope, SuccessEnvelope,
    UpdateUserRequest, UserResponse,
};
use crate::error::AppResult;
use crate::models::User;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Status code plus envelope body.
type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

const USER_NOT_FOUND: &str = "User not found";

/// Creates user-related routes, mounted under `/api/users`.
///
/// Routes:
/// - GET /                      - List all users
/// - POST /                     - Create a user
/// - GET /{id}                  - Get user by id
/// - PUT /{id}                  - Partially update a user
/// - DELETE /{id}               - Delete a user
/// - GET /email/{email}         - Get user by email
/// - GET /username/{username}   - Get user by username
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users, create_user))
        .routes(routes!(get_user, update_user, delete_user))
        .routes(routes!(get_user_by_email))
        .routes(routes!(get_user_by_username))
}

fn found(user: Option<User>) -> Reply<UserResponse> {
    match user {
        Some(user) => (
            StatusCode::OK,
            Json(ApiResponse::data(UserResponse::from(user))),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::failure(USER_NOT_FOUND)),
        ),
    }
}

/// GET /api/users - List all users
#[utoipa::path(
    get,
    path = "/",
    tag = USER_TAG,
    responses(
        (status = 200, description = "All stored users", body = SuccessEnvelope<Vec<UserResponse>>)
    )
)]
async fn list_users(State(state): State<AppState>) -> AppResult<Reply<Vec<UserResponse>>> {
    let users = state.services.users.list_users().await?;
    let responses: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok((
        StatusCode::OK,
        Json(ApiResponse::data_with_message(
            responses,
            "Users retrieved successfully",
        )),
    ))
}

/// GET /api/users/{id} - Get user by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = SuccessEnvelope<UserResponse>),
        (status = 404, description = "No user with this id", body = ErrorEnvelope)
    )
)]
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Reply<UserResponse>> {
    Ok(found(state.services.users.get_user(&id).await?))
}

/// GET /api/users/email/{email} - Get user by email
#[utoipa::path(
    get,
    path = "/email/{email}",
    tag = USER_TAG,
    params(("email" = String, Path, description = "Exact email address")),
    responses(
        (status = 200, description = "User found", body = SuccessEnvelope<UserResponse>),
        (status = 404, description = "No user with this email", body = ErrorEnvelope)
    )
)]
async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Reply<UserResponse>> {
    Ok(found(state.services.users.get_user_by_email(&email).await?))
}

/// GET /api/users/username/{username} - Get user by username
#[utoipa::path(
    get,
    path = "/username/{username}",
    tag = USER_TAG,
    params(("username" = String, Path, description = "Exact username")),
    responses(
        (status = 200, description = "User found", body = SuccessEnvelope<UserResponse>),
        (status = 404, description = "No user with this username", body = ErrorEnvelope)
    )
)]
async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Reply<UserResponse>> {
    Ok(found(
        state.services.users.get_user_by_username(&username).await?,
    ))
}

/// POST /api/users - Create a user
///
/// Fails with 400 when the email or the username is already taken.
#[utoipa::path(
    post,
    path = "/",
    tag = USER_TAG,
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = SuccessEnvelope<UserResponse>),
        (status = 400, description = "Duplicate email/username or malformed body", body = ErrorEnvelope)
    )
)]
async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<Reply<UserResponse>> {
    let user = state.services.users.create_user(payload.into_user()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data_with_message(
            UserResponse::from(user),
            "User created successfully",
        )),
    ))
}

/// PUT /api/users/{id} - Partially update a user
///
/// Only non-null fields are applied; `id` and `email` in the body are ignored.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = SuccessEnvelope<UserResponse>),
        (status = 400, description = "Malformed body", body = ErrorEnvelope),
        (status = 404, description = "No user with this id", body = ErrorEnvelope)
    )
)]
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Reply<UserResponse>> {
    let user = state
        .services
        .users
        .update_user(&id, payload.into_patch())
        .await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::data_with_message(
            UserResponse::from(user),
            "User updated successfully",
        )),
    ))
}

/// DELETE /api/users/{id} - Delete a user
///
/// Succeeds whether or not the id existed.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted (or was already absent)", body = MessageEnvelope)
    )
)]
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Reply<()>> {
    state.services.users.delete_user(&id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::message("User deleted successfully")),
    ))
}
