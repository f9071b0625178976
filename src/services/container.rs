//! Service Container - Centralized service access.
//!
//! SOLID (SRP): Manages service lifecycle and access.
//! SOLID (DIP): Depends on service traits, not implementations.

use std::sync::Arc;

use super::{AuthService, RetirementService, UserService};
use crate::config::Config;
use crate::infra::{EmailNotifier, Notifier, Persistence, RetirementRepository, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get retirement service
    fn retirement(&self) -> Arc<dyn RetirementService>;

    /// Get read access to retirement records
    fn retirements(&self) -> Arc<dyn RetirementRepository>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    retirement_service: Arc<dyn RetirementService>,
    retirements: Arc<dyn RetirementRepository>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        retirement_service: Arc<dyn RetirementService>,
        retirements: Arc<dyn RetirementRepository>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            retirement_service,
            retirements,
        }
    }

    /// Create service container from database connection and config,
    /// delivering mail over the configured SMTP relay
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let notifier = Arc::new(EmailNotifier::new(config.smtp.clone()));
        Self::with_notifier(db, config, notifier)
    }

    /// Create service container with a caller-supplied notifier
    pub fn with_notifier(
        db: sea_orm::DatabaseConnection,
        config: Config,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        use super::{Authenticator, LoginLockout, RetirementSettings, Retirer, UserManager};

        let uow = Arc::new(Persistence::new(db));
        let lockout = LoginLockout::new(uow.clone(), config.lockout);

        let retirement_settings = RetirementSettings {
            retired_user_salt: config.current_retired_user_salt().to_string(),
            platform_name: config.platform_name.clone(),
            contact_email: config.contact_email.clone(),
        };

        let retirements = uow.retirements();
        let retirement_service = Arc::new(Retirer::new(
            uow.clone(),
            lockout.clone(),
            notifier,
            retirement_settings,
        ));
        let user_service = Arc::new(UserManager::new(uow.clone()));
        let auth_service = Arc::new(Authenticator::new(uow, lockout, config));

        Self {
            auth_service,
            user_service,
            retirement_service,
            retirements,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn retirement(&self) -> Arc<dyn RetirementService> {
        self.retirement_service.clone()
    }

    fn retirements(&self) -> Arc<dyn RetirementRepository> {
        self.retirements.clone()
    }
}
