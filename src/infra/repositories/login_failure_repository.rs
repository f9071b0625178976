//! Login failure counter repository.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use super::entities::login_failure::Entity as LoginFailureEntity;
use crate::domain::LoginFailures;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Read and reset access to lockout counters.
///
/// Increments go through the transactional repository so concurrent
/// failures are serialized.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LoginFailureRepository: Send + Sync {
    /// Current counter for a user, if any failure was recorded
    async fn find(&self, user_id: Uuid) -> AppResult<Option<LoginFailures>>;

    /// Remove the counter (successful authentication)
    async fn clear(&self, user_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of LoginFailureRepository
pub struct LoginFailureStore {
    db: DatabaseConnection,
}

impl LoginFailureStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LoginFailureRepository for LoginFailureStore {
    async fn find(&self, user_id: Uuid) -> AppResult<Option<LoginFailures>> {
        let result = LoginFailureEntity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(LoginFailures::from))
    }

    async fn clear(&self, user_id: Uuid) -> AppResult<()> {
        LoginFailureEntity::delete_by_id(user_id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}
