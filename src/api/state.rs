//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, RetirementRepository};
use crate::services::{
    AuthService, RetirementService, ServiceContainer, Services, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Account deactivation
    pub retirement_service: Arc<dyn RetirementService>,
    /// Retirement records, consulted when admitting bearer tokens
    pub retirements: Arc<dyn RetirementRepository>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_services(&container, database)
    }

    /// Create application state from an assembled service container.
    pub fn from_services(container: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            retirement_service: container.retirement(),
            retirements: container.retirements(),
            database,
        }
    }
}
