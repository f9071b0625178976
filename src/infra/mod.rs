//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Outbound email
//! - Unit of Work for transaction management

pub mod db;
pub mod mailer;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use mailer::{EmailNotifier, Notifier};
pub use repositories::{
    LoginFailureRepository, NewUser, OAuthProvider, RetirementRepository, UserRepository,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TxLoginFailureRepository, TxUserRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use mailer::MockNotifier;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockLoginFailureRepository, MockRetirementRepository, MockUserRepository};
