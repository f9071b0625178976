//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod login_failure;
pub mod oauth_legacy_token;
pub mod oauth_toolkit_token;
pub mod registration;
pub mod retirement_status;
pub mod social_auth;
pub mod user;
