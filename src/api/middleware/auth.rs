//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
}

impl CurrentUser {
    /// Whether the path addresses the authenticated user.
    pub fn owns(&self, username: &str) -> bool {
        self.username == username
    }
}

/// JWT authentication middleware.
///
/// Extracts and validates the JWT token from the Authorization header,
/// then injects the CurrentUser into the request extensions. Tokens of
/// accounts that have entered retirement are refused, which ends every
/// session of a deactivated user.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token)?;

    if state.retirements.is_retiring(claims.sub).await? {
        tracing::debug!(user_id = %claims.sub, "Refusing token of retired account");
        return Err(AppError::Unauthorized);
    }

    let current_user = CurrentUser {
        id: claims.sub,
        username: claims.username,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}
