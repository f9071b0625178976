//! User service - Handles user-related business logic.
//!
//! SOLID (SRP): Handles user-related use cases only.
//! DDD: Orchestrates domain operations via Unit of Work.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::User;
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID; `AccountNotFound` when missing
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Get user by username
    async fn get_by_username(&self, username: &str) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::AccountNotFound)
    }

    async fn get_by_username(&self, username: &str) -> AppResult<User> {
        self.uow
            .users()
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::user_not_found(username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::unit_of_work::testing::MockUnitOfWork;
    use crate::infra::MockUserRepository;
    use mockall::predicate::eq;

    fn create_test_user(id: Uuid) -> User {
        User::new(
            id,
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hashed".to_string(),
            "Alice".to_string(),
            "en".to_string(),
        )
    }

    fn manager(repo: MockUserRepository) -> UserManager<MockUnitOfWork> {
        UserManager::new(Arc::new(MockUnitOfWork::new().with_users(repo)))
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let user_id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(user_id))
            .times(1)
            .returning(move |id| Ok(Some(create_test_user(id))));

        let user = manager(repo).get_user(user_id).await.unwrap();
        assert_eq!(user.id, user_id);
    }

    #[tokio::test]
    async fn test_get_user_missing_does_not_leak_the_id() {
        let id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let err = manager(repo).get_user(id).await.unwrap_err();
        assert!(matches!(err, AppError::AccountNotFound));
        assert!(!err.user_message().contains(&id.to_string()));
    }

    #[tokio::test]
    async fn test_get_by_username_reports_the_name() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .withf(|name| name == "ghost")
            .returning(|_| Ok(None));

        let err = manager(repo).get_by_username("ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "The user \"ghost\" does not exist.");
    }
}
