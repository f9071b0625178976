//! Retirement ledger repositories.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::retirement_status::{self, ActiveModel, Entity as RetirementEntity};
use crate::config::RETIREMENT_STATE_PENDING;
use crate::domain::{RetirementRecord, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Read access to retirement records outside a transaction.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RetirementRepository: Send + Sync {
    /// Record for a user, if retirement has started
    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<RetirementRecord>>;

    /// Whether the user has entered retirement
    async fn is_retiring(&self, user_id: Uuid) -> AppResult<bool>;
}

/// Concrete implementation of RetirementRepository
pub struct RetirementStore {
    db: DatabaseConnection,
}

impl RetirementStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RetirementRepository for RetirementStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<RetirementRecord>> {
        let result = RetirementEntity::find()
            .filter(retirement_status::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(RetirementRecord::from))
    }

    async fn is_retiring(&self, user_id: Uuid) -> AppResult<bool> {
        let count = RetirementEntity::find()
            .filter(retirement_status::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }
}

/// Transaction-aware retirement ledger.
pub struct TxRetirementRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxRetirementRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<RetirementRecord>> {
        let result = RetirementEntity::find()
            .filter(retirement_status::Column::UserId.eq(user_id))
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(RetirementRecord::from))
    }

    /// Open the retirement record for a user, capturing the original identifiers.
    ///
    /// Fails with `AlreadyRetiring` if a record exists, including one
    /// inserted concurrently (unique index on `user_id`).
    pub async fn create(&self, user: &User, retired_email: &str) -> AppResult<RetirementRecord> {
        if self.find_by_user_id(user.id).await?.is_some() {
            return Err(AppError::AlreadyRetiring);
        }

        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            original_username: Set(user.username.clone()),
            original_email: Set(user.email.clone()),
            original_name: Set(user.name.clone()),
            retired_email: Set(retired_email.to_string()),
            current_state: Set(RETIREMENT_STATE_PENDING.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match active_model.insert(self.txn).await {
            Ok(model) => Ok(RetirementRecord::from(model)),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AppError::AlreadyRetiring)
            }
            Err(err) => Err(AppError::from(err)),
        }
    }
}
