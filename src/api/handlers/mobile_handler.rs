//! Mobile API user handlers.
//!
//! Every route addresses `{username}`, which must be the authenticated
//! user; any other username is answered as if it did not exist.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::extractors::FormBody;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::DEACTIVATION_SUCCESS_CODE;
use crate::domain::UserResponse;
use crate::errors::{AppError, AppResult};
use crate::types::MessageResponse;

/// Deactivation form
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeactivateRequest {
    /// Current password, re-entered to confirm the deletion
    #[schema(example = "SecurePass123!")]
    pub password: Option<String>,
}

/// Create mobile user routes (require authentication)
pub fn mobile_routes() -> Router<AppState> {
    Router::new()
        .route("/:username/", get(get_user_detail))
        .route("/:username/deactivate_logout/", post(deactivate_logout))
}

fn ensure_owner(current_user: &CurrentUser, username: &str) -> AppResult<()> {
    if current_user.owns(username) {
        Ok(())
    } else {
        Err(AppError::user_not_found(username))
    }
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/mobile/v1/users/{username}/",
    tag = "Mobile",
    params(("username" = String, Path, description = "Username of the authenticated user")),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user_detail(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    ensure_owner(&current_user, &username)?;

    let user = state.user_service.get_user(current_user.id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Deactivate the authenticated user's account and end their sessions
#[utoipa::path(
    post,
    path = "/api/mobile/v1/users/{username}/deactivate_logout/",
    tag = "Mobile",
    params(("username" = String, Path, description = "Username of the authenticated user")),
    request_body(content = DeactivateRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Account retired", body = MessageResponse),
        (status = 400, description = "Password not specified", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 403, description = "Wrong password or account locked", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse),
        (status = 409, description = "Retirement already in progress", body = MessageResponse),
        (status = 503, description = "Storage unavailable, nothing changed", body = MessageResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn deactivate_logout(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(username): Path<String>,
    FormBody(payload): FormBody<DeactivateRequest>,
) -> AppResult<Json<MessageResponse>> {
    ensure_owner(&current_user, &username)?;

    let password = payload
        .password
        .ok_or_else(|| AppError::bad_request("Password not specified."))?;

    // Locale is read before the account is scrubbed
    let locale = state.user_service.get_user(current_user.id).await?.locale();

    let outcome = state
        .retirement_service
        .deactivate(current_user.id, &password)
        .await?;

    tracing::info!(
        user_id = %outcome.user_id,
        notification_sent = outcome.notification_sent,
        "Deactivated via mobile API"
    );

    Ok(Json(MessageResponse::new(
        locale.deactivation_confirmation(),
        DEACTIVATION_SUCCESS_CODE,
    )))
}
