//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Func, SimpleExpr},
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use uuid::Uuid;

use super::entities::retirement_status::{self, Entity as RetirementEntity};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::User;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Fields required to create an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub language: String,
}

/// `lower(email) = lower(address)`, matching the unique index on users.
fn email_matches(address: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(user::Column::Email))).eq(address.to_lowercase())
}

/// Same comparison against addresses captured by retirement records.
fn retired_address_matches(address: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(retirement_status::Column::OriginalEmail)))
        .eq(address.to_lowercase())
}

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find user by username or by email address (case-insensitive)
    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>>;

    /// Create a new user; `Conflict` when the username is taken or the
    /// email, ignoring case, belongs to a live or retired account
    async fn create(&self, new_user: NewUser) -> AppResult<User>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(login))
                    .add(email_matches(login)),
            )
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let taken = UserEntity::find()
            .filter(email_matches(&new_user.email))
            .one(&self.db)
            .await?;
        // A retired address would derive the placeholder its old owner holds
        let retired = RetirementEntity::find()
            .filter(retired_address_matches(&new_user.email))
            .one(&self.db)
            .await?;
        if taken.is_some() || retired.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            name: Set(new_user.name),
            language: Set(new_user.language),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match active_model.insert(&self.db).await {
            Ok(model) => Ok(User::from(model)),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AppError::conflict("User"))
            }
            Err(err) => Err(AppError::from(err)),
        }
    }
}
