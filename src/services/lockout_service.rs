//! Login lockout policy.
//!
//! Shared by every flow that verifies a password (login and
//! deactivation), so failures in one count against the other.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::LockoutSettings;
use crate::domain::LoginFailures;
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Failed-attempt counter with a temporary lock once a threshold is hit.
///
/// Every operation is a no-op when the policy is disabled.
pub struct LoginLockout<U: UnitOfWork> {
    uow: Arc<U>,
    settings: LockoutSettings,
}

impl<U: UnitOfWork> Clone for LoginLockout<U> {
    fn clone(&self) -> Self {
        Self {
            uow: self.uow.clone(),
            settings: self.settings,
        }
    }
}

impl<U: UnitOfWork> LoginLockout<U> {
    pub fn new(uow: Arc<U>, settings: LockoutSettings) -> Self {
        Self { uow, settings }
    }

    /// Whether the user is currently locked out
    pub async fn is_locked_out(&self, user_id: Uuid) -> AppResult<bool> {
        if !self.settings.enabled {
            return Ok(false);
        }

        let failures = self.uow.login_failures().find(user_id).await?;
        Ok(failures.is_some_and(|f| f.is_locked_out_at(Utc::now())))
    }

    /// Fail with `AuthLockedOut` when the user is locked out
    pub async fn ensure_not_locked(&self, user_id: Uuid) -> AppResult<()> {
        if self.is_locked_out(user_id).await? {
            tracing::warn!(%user_id, "Rejected attempt on locked account");
            return Err(AppError::AuthLockedOut {
                minutes: self.settings.period_minutes(),
            });
        }
        Ok(())
    }

    /// Count one failed attempt. Increments are serialized per database.
    pub async fn record_failure(&self, user_id: Uuid) -> AppResult<Option<LoginFailures>> {
        if !self.settings.enabled {
            return Ok(None);
        }

        let settings = self.settings;
        let failures = self
            .uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    let repo = ctx.login_failures();
                    let mut failures = repo
                        .find(user_id)
                        .await?
                        .unwrap_or_else(|| LoginFailures::new(user_id));

                    failures.register_failure(Utc::now(), &settings);
                    repo.save(&failures).await?;
                    Ok(failures)
                })
            })
            .await?;

        if failures.lockout_until.is_some() {
            tracing::warn!(
                %user_id,
                attempts = failures.failure_count,
                "Account locked after repeated failures"
            );
        }

        Ok(Some(failures))
    }

    /// Reset the counter after a successful authentication
    pub async fn clear_failures(&self, user_id: Uuid) -> AppResult<()> {
        if !self.settings.enabled {
            return Ok(());
        }
        self.uow.login_failures().clear(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::unit_of_work::testing::MockUnitOfWork;
    use crate::infra::MockLoginFailureRepository;
    use chrono::Duration;

    fn enabled() -> LockoutSettings {
        LockoutSettings {
            enabled: true,
            max_attempts: 3,
            period_secs: 900,
        }
    }

    fn lockout(
        repo: MockLoginFailureRepository,
        settings: LockoutSettings,
    ) -> LoginLockout<MockUnitOfWork> {
        let uow = MockUnitOfWork::new().with_login_failures(repo);
        LoginLockout::new(Arc::new(uow), settings)
    }

    #[tokio::test]
    async fn test_disabled_policy_never_touches_storage() {
        // No expectations: any repository call would panic
        let lockout = lockout(MockLoginFailureRepository::new(), LockoutSettings::disabled());
        let user_id = Uuid::new_v4();

        assert!(!lockout.is_locked_out(user_id).await.unwrap());
        assert!(lockout.record_failure(user_id).await.unwrap().is_none());
        assert!(lockout.clear_failures(user_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_locked_user_is_rejected_with_period_in_minutes() {
        let mut repo = MockLoginFailureRepository::new();
        repo.expect_find().returning(|id| {
            Ok(Some(LoginFailures {
                user_id: id,
                failure_count: 3,
                lockout_until: Some(Utc::now() + Duration::minutes(10)),
            }))
        });

        let lockout = lockout(repo, enabled());
        let result = lockout.ensure_not_locked(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::AuthLockedOut { minutes: 15 })));
    }

    #[tokio::test]
    async fn test_expired_lock_allows_attempt() {
        let mut repo = MockLoginFailureRepository::new();
        repo.expect_find().returning(|id| {
            Ok(Some(LoginFailures {
                user_id: id,
                failure_count: 3,
                lockout_until: Some(Utc::now() - Duration::seconds(1)),
            }))
        });

        let lockout = lockout(repo, enabled());
        assert!(lockout.ensure_not_locked(Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn test_clear_delegates_to_repository() {
        let user_id = Uuid::new_v4();
        let mut repo = MockLoginFailureRepository::new();
        repo.expect_clear()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| Ok(()));

        let lockout = lockout(repo, enabled());
        assert!(lockout.clear_failures(user_id).await.is_ok());
    }
}
