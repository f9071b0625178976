//! Repositories for credentials linked to an account: third-party identity
//! links, pending activation keys and OAuth2 tokens.
//!
//! Only deletion is exposed; these rows are created by the login,
//! registration and OAuth2 flows.

use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::entities::{oauth_legacy_token, oauth_toolkit_token, registration, social_auth};
use crate::errors::{AppError, AppResult};

/// The two OAuth2 provider implementations tokens can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    /// Legacy provider kept for older mobile clients
    Legacy,
    /// Current OAuth2 toolkit provider
    Toolkit,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 2] = [OAuthProvider::Legacy, OAuthProvider::Toolkit];

    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Legacy => "legacy",
            OAuthProvider::Toolkit => "toolkit",
        }
    }
}

impl std::fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction-aware third-party identity links.
pub struct TxSocialLinkRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxSocialLinkRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Hard delete every link of a user, returning the number removed
    pub async fn delete_all(&self, user_id: Uuid) -> AppResult<u64> {
        let result = social_auth::Entity::delete_many()
            .filter(social_auth::Column::UserId.eq(user_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}

/// Transaction-aware pending activation keys.
pub struct TxRegistrationRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxRegistrationRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn delete_all(&self, user_id: Uuid) -> AppResult<u64> {
        let result = registration::Entity::delete_many()
            .filter(registration::Column::UserId.eq(user_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}

/// Transaction-aware OAuth2 token store covering both providers.
pub struct TxOAuthTokenRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxOAuthTokenRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Revoke every access token, refresh token and grant a provider issued to a user
    pub async fn revoke_all(&self, provider: OAuthProvider, user_id: Uuid) -> AppResult<u64> {
        let result = match provider {
            OAuthProvider::Legacy => {
                oauth_legacy_token::Entity::delete_many()
                    .filter(oauth_legacy_token::Column::UserId.eq(user_id))
                    .exec(self.txn)
                    .await
            }
            OAuthProvider::Toolkit => {
                oauth_toolkit_token::Entity::delete_many()
                    .filter(oauth_toolkit_token::Column::UserId.eq(user_id))
                    .exec(self.txn)
                    .await
            }
        }
        .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
