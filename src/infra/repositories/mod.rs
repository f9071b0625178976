//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.
//! `Tx*` repositories operate inside a unit-of-work transaction.

mod credential_repository;
pub mod entities;
mod login_failure_repository;
mod retirement_repository;
mod user_repository;

pub use credential_repository::{
    OAuthProvider, TxOAuthTokenRepository, TxRegistrationRepository, TxSocialLinkRepository,
};
pub use login_failure_repository::{LoginFailureRepository, LoginFailureStore};
pub use retirement_repository::{RetirementRepository, RetirementStore, TxRetirementRepository};
pub use user_repository::{NewUser, UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use login_failure_repository::MockLoginFailureRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use retirement_repository::MockRetirementRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
