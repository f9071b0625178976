//! Unit of Work pattern implementation.
//!
//! The Unit of Work:
//! - Centralizes access to all repositories
//! - Manages database transactions (begin, commit, rollback)
//! - Ensures consistency across multiple repository operations
//! - Provides atomic operations for the retirement workflow

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IsolationLevel, Set, TransactionTrait,
};
use std::sync::Arc;

use super::repositories::entities::login_failure::{
    ActiveModel as LoginFailureActiveModel, Entity as LoginFailureEntity,
};
use super::repositories::entities::user::{ActiveModel as UserActiveModel, Entity as UserEntity};
use super::repositories::{
    LoginFailureRepository, LoginFailureStore, RetirementRepository, RetirementStore,
    TxOAuthTokenRepository, TxRegistrationRepository, TxRetirementRepository,
    TxSocialLinkRepository, UserRepository, UserStore,
};
use crate::domain::{LoginFailures, User};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, mock at the service level or run against SQLite.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get login failure repository
    fn login_failures(&self) -> Arc<dyn LoginFailureRepository>;

    /// Get retirement ledger repository
    fn retirements(&self) -> Arc<dyn RetirementRepository>;

    /// Execute a closure within a serializable transaction.
    ///
    /// Committed on success, rolled back on error. Used by retirement and
    /// lockout counter updates.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository::new(self.txn)
    }

    pub fn login_failures(&self) -> TxLoginFailureRepository<'_> {
        TxLoginFailureRepository::new(self.txn)
    }

    pub fn retirements(&self) -> TxRetirementRepository<'_> {
        TxRetirementRepository::new(self.txn)
    }

    pub fn social_links(&self) -> TxSocialLinkRepository<'_> {
        TxSocialLinkRepository::new(self.txn)
    }

    pub fn registrations(&self) -> TxRegistrationRepository<'_> {
        TxRegistrationRepository::new(self.txn)
    }

    pub fn oauth_tokens(&self) -> TxOAuthTokenRepository<'_> {
        TxOAuthTokenRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    login_failure_repo: Arc<LoginFailureStore>,
    retirement_repo: Arc<RetirementStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            login_failure_repo: Arc::new(LoginFailureStore::new(db.clone())),
            retirement_repo: Arc::new(RetirementStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn login_failures(&self) -> Arc<dyn LoginFailureRepository> {
        self.login_failure_repo.clone()
    }

    fn retirements(&self) -> Arc<dyn RetirementRepository> {
        self.retirement_repo.clone()
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f).await
    }
}

/// Transaction-aware user repository.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: uuid::Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    /// Persist the mutable fields of a user (email, credential, profile, status)
    pub async fn save(&self, user: &User) -> AppResult<User> {
        let existing = UserEntity::find_by_id(user.id)
            .one(self.txn)
            .await?
            .ok_or_else(|| AppError::user_not_found(user.username.clone()))?;

        let mut active: UserActiveModel = existing.into();
        active.email = Set(user.email.clone());
        active.password_hash = Set(user.password_hash.clone());
        active.name = Set(user.name.clone());
        active.language = Set(user.language.clone());
        active.is_active = Set(user.is_active);
        active.updated_at = Set(user.updated_at);

        let model = active.update(self.txn).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    /// Replace the credential with one that can never verify
    pub async fn set_unusable_password(&self, user: &mut User) -> AppResult<()> {
        user.set_unusable_password();
        self.save(user).await?;
        Ok(())
    }
}

/// Transaction-aware login failure counters.
pub struct TxLoginFailureRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxLoginFailureRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find(&self, user_id: uuid::Uuid) -> AppResult<Option<LoginFailures>> {
        let result = LoginFailureEntity::find_by_id(user_id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(LoginFailures::from))
    }

    /// Insert or update the counter row
    pub async fn save(&self, failures: &LoginFailures) -> AppResult<()> {
        let existing = LoginFailureEntity::find_by_id(failures.user_id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        match existing {
            Some(model) => {
                let mut active: LoginFailureActiveModel = model.into();
                active.failure_count = Set(failures.failure_count);
                active.lockout_until = Set(failures.lockout_until);
                active.update(self.txn).await.map_err(AppError::from)?;
            }
            None => {
                let active = LoginFailureActiveModel {
                    user_id: Set(failures.user_id),
                    failure_count: Set(failures.failure_count),
                    lockout_until: Set(failures.lockout_until),
                };
                active.insert(self.txn).await.map_err(AppError::from)?;
            }
        }

        Ok(())
    }
}

/// Unit of work over mock repositories for service unit tests.
///
/// Transactions never run their closure. They fail with
/// `AppError::Internal` unless a test supplies another failure.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::infra::repositories::{
        MockLoginFailureRepository, MockRetirementRepository, MockUserRepository,
    };

    pub(crate) struct MockUnitOfWork {
        users: Arc<MockUserRepository>,
        login_failures: Arc<MockLoginFailureRepository>,
        retirements: Arc<MockRetirementRepository>,
        transaction_error: Box<dyn Fn() -> AppError + Send + Sync>,
    }

    impl MockUnitOfWork {
        pub(crate) fn new() -> Self {
            Self {
                users: Arc::new(MockUserRepository::new()),
                login_failures: Arc::new(MockLoginFailureRepository::new()),
                retirements: Arc::new(MockRetirementRepository::new()),
                transaction_error: Box::new(|| {
                    AppError::internal("transactions unavailable in mock")
                }),
            }
        }

        /// Failure every transaction reports
        pub(crate) fn with_transaction_error(
            mut self,
            error: impl Fn() -> AppError + Send + Sync + 'static,
        ) -> Self {
            self.transaction_error = Box::new(error);
            self
        }

        pub(crate) fn with_users(mut self, repo: MockUserRepository) -> Self {
            self.users = Arc::new(repo);
            self
        }

        pub(crate) fn with_login_failures(mut self, repo: MockLoginFailureRepository) -> Self {
            self.login_failures = Arc::new(repo);
            self
        }

        pub(crate) fn with_retirements(mut self, repo: MockRetirementRepository) -> Self {
            self.retirements = Arc::new(repo);
            self
        }
    }

    #[async_trait]
    impl UnitOfWork for MockUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone()
        }

        fn login_failures(&self) -> Arc<dyn LoginFailureRepository> {
            self.login_failures.clone()
        }

        fn retirements(&self) -> Arc<dyn RetirementRepository> {
            self.retirements.clone()
        }

        async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(
                    TransactionContext<'a>,
                ) -> std::pin::Pin<
                    Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
                > + Send,
            T: Send,
        {
            Err((self.transaction_error)())
        }
    }
}
