//! Retirement service - User-initiated account deactivation.
//!
//! Re-verifies the password, then scrubs the account and removes every
//! linked credential in one serializable transaction. The deletion
//! notice goes out only after commit and never undoes the retirement.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::LoginLockout;
use crate::domain::{
    retired_email_for, NotificationMessage, RetirementOutcome, TemplateContext, User,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{Notifier, OAuthProvider, UnitOfWork};

/// Retirement service trait for dependency injection.
#[async_trait]
pub trait RetirementService: Send + Sync {
    /// Deactivate the account of an already authenticated user
    async fn deactivate(&self, user_id: Uuid, password: &str) -> AppResult<RetirementOutcome>;
}

/// Static values the retirement flow needs from configuration.
#[derive(Debug, Clone)]
pub struct RetirementSettings {
    /// Salt for retired email placeholders
    pub retired_user_salt: String,
    pub platform_name: String,
    pub contact_email: String,
}

/// Concrete implementation of RetirementService using Unit of Work.
pub struct Retirer<U: UnitOfWork> {
    uow: Arc<U>,
    lockout: LoginLockout<U>,
    notifier: Arc<dyn Notifier>,
    settings: RetirementSettings,
}

impl<U: UnitOfWork> Retirer<U> {
    pub fn new(
        uow: Arc<U>,
        lockout: LoginLockout<U>,
        notifier: Arc<dyn Notifier>,
        settings: RetirementSettings,
    ) -> Self {
        Self {
            uow,
            lockout,
            notifier,
            settings,
        }
    }

    /// Lockout check, then password verification with counter bookkeeping.
    async fn verify_password(&self, user: &User, password: &str) -> AppResult<()> {
        self.lockout.ensure_not_locked(user.id).await?;

        if !user.check_password(password) {
            self.lockout.record_failure(user.id).await?;
            tracing::info!(user_id = %user.id, "Deactivation rejected: wrong password");
            return Err(AppError::AuthFailed);
        }

        self.lockout.clear_failures(user.id).await
    }

    /// Every state change of a retirement, committed or rolled back together.
    async fn retire(&self, user_id: Uuid, username: String) -> AppResult<User> {
        let salt = self.settings.retired_user_salt.clone();

        self.uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    let mut user = ctx
                        .users()
                        .find_by_id(user_id)
                        .await?
                        .ok_or_else(|| AppError::user_not_found(username))?;
                    let original = user.clone();
                    let retired_email = retired_email_for(&original.email, &salt);

                    ctx.retirements().create(&original, &retired_email).await?;

                    let links = ctx.social_links().delete_all(user_id).await?;

                    user.set_email(retired_email);
                    ctx.users().set_unusable_password(&mut user).await?;

                    let registrations = ctx.registrations().delete_all(user_id).await?;

                    let mut tokens = 0;
                    for provider in OAuthProvider::ALL {
                        tokens += ctx.oauth_tokens().revoke_all(provider, user_id).await?;
                    }

                    tracing::debug!(
                        %user_id,
                        social_links = links,
                        registrations,
                        oauth_tokens = tokens,
                        "Account scrubbed"
                    );

                    Ok(original)
                })
            })
            .await
    }

    /// Classify a failed retirement transaction.
    ///
    /// A concurrent retirement of the same user can abort this one with a
    /// serialization failure instead of a unique violation; once the other
    /// record is visible the caller gets `AlreadyRetiring`.
    async fn settle_conflict(&self, user_id: Uuid, err: sea_orm::DbErr) -> AppError {
        match self.uow.retirements().is_retiring(user_id).await {
            Ok(true) => {
                tracing::info!(%user_id, error = %err, "Lost retirement race");
                AppError::AlreadyRetiring
            }
            Ok(false) => AppError::Database(err),
            Err(recheck) => {
                tracing::warn!(%user_id, error = %recheck, "Retirement re-check failed");
                AppError::Database(err)
            }
        }
    }

    /// Best-effort deletion notice to the pre-retirement address.
    async fn notify(&self, original: &User) -> bool {
        let message = NotificationMessage::new(
            original.id,
            original.email.clone(),
            original.locale(),
            TemplateContext {
                full_name: original.name.clone(),
                platform_name: self.settings.platform_name.clone(),
                contact_email: self.settings.contact_email.clone(),
            },
        );

        match self.notifier.send_deletion_notice(&message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    user_id = %original.id,
                    error = %e,
                    "Deletion notice failed; retirement stands"
                );
                false
            }
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> RetirementService for Retirer<U> {
    async fn deactivate(&self, user_id: Uuid, password: &str) -> AppResult<RetirementOutcome> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        // Retired credentials never verify; repeats are answered first
        if self.uow.retirements().is_retiring(user.id).await? {
            return Err(AppError::AlreadyRetiring);
        }

        self.verify_password(&user, password).await?;

        let original = match self.retire(user.id, user.username.clone()).await {
            Ok(original) => original,
            Err(AppError::Database(err)) => {
                return Err(self.settle_conflict(user.id, err).await);
            }
            Err(e) => return Err(e),
        };
        tracing::info!(user_id = %user.id, "Account retired");

        let notification_sent = self.notify(&original).await;

        Ok(RetirementOutcome {
            user_id: original.id,
            retired_at: Utc::now(),
            notification_sent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LockoutSettings;
    use crate::domain::Password;
    use crate::infra::unit_of_work::testing::MockUnitOfWork;
    use crate::infra::{MockNotifier, MockRetirementRepository, MockUserRepository};

    fn user(id: Uuid) -> User {
        User::new(
            id,
            "bob".to_string(),
            "bob@example.com".to_string(),
            Password::new("correct-horse").unwrap().into_string(),
            "Bob".to_string(),
            "en".to_string(),
        )
    }

    fn settings() -> RetirementSettings {
        RetirementSettings {
            retired_user_salt: "salt".to_string(),
            platform_name: "Open edX".to_string(),
            contact_email: "support@example.com".to_string(),
        }
    }

    fn retirer(uow: MockUnitOfWork, notifier: MockNotifier) -> Retirer<MockUnitOfWork> {
        let uow = Arc::new(uow);
        let lockout = LoginLockout::new(uow.clone(), LockoutSettings::disabled());
        Retirer::new(uow, lockout, Arc::new(notifier), settings())
    }

    fn users_returning(user: Option<User>) -> MockUserRepository {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(user.clone()));
        repo
    }

    fn retirements(retiring: bool) -> MockRetirementRepository {
        let mut repo = MockRetirementRepository::new();
        repo.expect_is_retiring().returning(move |_| Ok(retiring));
        repo
    }

    #[tokio::test]
    async fn test_wrong_password_fails_before_any_mutation() {
        let id = Uuid::new_v4();
        let uow = MockUnitOfWork::new()
            .with_users(users_returning(Some(user(id))))
            .with_retirements(retirements(false));
        let mut notifier = MockNotifier::new();
        notifier.expect_send_deletion_notice().never();

        // A transaction would fail with Internal; AuthFailed proves none began
        let result = retirer(uow, notifier).deactivate(id, "wrong").await;
        assert!(matches!(result, Err(AppError::AuthFailed)));
    }

    #[tokio::test]
    async fn test_repeat_request_is_conflict_without_verification() {
        let id = Uuid::new_v4();
        let uow = MockUnitOfWork::new()
            .with_users(users_returning(Some(user(id))))
            .with_retirements(retirements(true));

        let result = retirer(uow, MockNotifier::new())
            .deactivate(id, "correct-horse")
            .await;
        assert!(matches!(result, Err(AppError::AlreadyRetiring)));
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found_without_exposing_the_id() {
        let id = Uuid::new_v4();
        let uow = MockUnitOfWork::new().with_users(users_returning(None));

        let err = retirer(uow, MockNotifier::new())
            .deactivate(id, "correct-horse")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AccountNotFound));
        assert!(!err.user_message().contains(&id.to_string()));
    }

    fn serialization_failure() -> AppError {
        AppError::Database(sea_orm::DbErr::Custom(
            "could not serialize access due to concurrent update".to_string(),
        ))
    }

    #[tokio::test]
    async fn test_serialization_failure_after_concurrent_retirement_is_conflict() {
        let id = Uuid::new_v4();
        let mut ledger = MockRetirementRepository::new();
        let mut checks = 0;
        ledger.expect_is_retiring().times(2).returning(move |_| {
            checks += 1;
            // Free at the pre-check, taken by the winner afterwards
            Ok(checks > 1)
        });
        let uow = MockUnitOfWork::new()
            .with_users(users_returning(Some(user(id))))
            .with_retirements(ledger)
            .with_transaction_error(serialization_failure);
        let mut notifier = MockNotifier::new();
        notifier.expect_send_deletion_notice().never();

        let result = retirer(uow, notifier).deactivate(id, "correct-horse").await;
        assert!(matches!(result, Err(AppError::AlreadyRetiring)));
    }

    #[tokio::test]
    async fn test_database_failure_without_competing_record_stays_retryable() {
        let id = Uuid::new_v4();
        let uow = MockUnitOfWork::new()
            .with_users(users_returning(Some(user(id))))
            .with_retirements(retirements(false))
            .with_transaction_error(serialization_failure);

        let err = retirer(uow, MockNotifier::new())
            .deactivate(id, "correct-horse")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_notify_reports_delivery_failure_without_error() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_deletion_notice()
            .withf(|message| message.recipient == "bob@example.com")
            .times(1)
            .returning(|_| Err(AppError::notification("relay refused")));

        let retirer = retirer(MockUnitOfWork::new(), notifier);
        assert!(!retirer.notify(&user(Uuid::new_v4())).await);
    }
}
