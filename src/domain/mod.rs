//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod lockout;
pub mod notification;
pub mod password;
pub mod retirement;
pub mod user;

pub use lockout::LoginFailures;
pub use notification::{Locale, NotificationMessage, RenderedEmail, TemplateContext};
pub use password::Password;
pub use retirement::{is_retired_email, retired_email_for, RetirementOutcome, RetirementRecord};
pub use user::{User, UserResponse};
