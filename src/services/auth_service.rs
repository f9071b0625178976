//! Authentication service - Handles user authentication and authorization.
//!
//! SOLID (SRP): Handles authentication concerns only.
//! DDD: Uses domain Password value object for verification.
//! DDD: Uses Unit of Work for repository access.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::LoginLockout;
use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Login with a username or email address and return a JWT token
    async fn login(&self, login: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate JWT token for a user
fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Verify JWT token and extract claims
fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    lockout: LoginLockout<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, lockout: LoginLockout<U>, config: Config) -> Self {
        Self {
            uow,
            lockout,
            config,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, login: String, password: String) -> AppResult<TokenResponse> {
        let Some(user) = self.uow.users().find_by_login(&login).await? else {
            // Burn the same verification cost so unknown logins are not
            // distinguishable by timing
            let dummy = Password::from_hash(
                "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012"
                    .to_string(),
            );
            let _ = dummy.verify(&password);
            return Err(AppError::AuthFailed);
        };

        self.lockout.ensure_not_locked(user.id).await?;

        if !user.is_active || !user.check_password(&password) {
            self.lockout.record_failure(user.id).await?;
            tracing::info!(user_id = %user.id, "Login failed");
            return Err(AppError::AuthFailed);
        }

        self.lockout.clear_failures(user.id).await?;
        tracing::info!(user_id = %user.id, "Login succeeded");
        generate_token(&user, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            Uuid::new_v4(),
            "alice".to_string(),
            "alice@example.com".to_string(),
            Password::new("correct-horse").unwrap().into_string(),
            "Alice".to_string(),
            "en".to_string(),
        )
    }

    #[test]
    fn test_token_round_trip_carries_identity() {
        let config = Config::for_tests("sqlite::memory:");
        let user = user();

        let token = generate_token(&user, &config).unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, config.jwt_expiration_hours * 3600);

        let claims = verify_token_internal(&token.access_token, &config).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let config = Config::for_tests("sqlite::memory:");
        let token = generate_token(&user(), &config).unwrap();

        let result = verify_token_internal(&format!("{}x", token.access_token), &config);
        assert!(matches!(result, Err(AppError::Jwt(_))));
    }
}
