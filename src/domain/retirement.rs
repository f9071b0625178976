//! Retirement record and retired-identifier derivation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::{RETIRED_EMAIL_DOMAIN, RETIRED_EMAIL_PREFIX};

/// Marks that a user has entered retirement.
///
/// Created once, at the start of a successful retirement, with the
/// identifiers downstream processing needs after the live record is
/// scrubbed.
#[derive(Debug, Clone, Serialize)]
pub struct RetirementRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub original_username: String,
    pub original_email: String,
    pub original_name: String,
    pub retired_email: String,
    pub current_state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a completed deactivation.
#[derive(Debug, Clone, Serialize)]
pub struct RetirementOutcome {
    pub user_id: Uuid,
    pub retired_at: DateTime<Utc>,
    /// False when the confirmation could not be delivered
    pub notification_sent: bool,
}

/// Hex SHA-256 of `salt || lowercase(value)`.
fn retired_hash(value: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(value.to_lowercase().as_bytes());
    hex::encode(hasher.finalize())
}

/// Placeholder email that replaces a retired user's address.
///
/// Stable for the same address and salt, case-insensitive, and not
/// reversible to the original address.
pub fn retired_email_for(email: &str, salt: &str) -> String {
    format!(
        "{}{}@{}",
        RETIRED_EMAIL_PREFIX,
        retired_hash(email, salt),
        RETIRED_EMAIL_DOMAIN
    )
}

/// Whether an address is a retired placeholder.
pub fn is_retired_email(email: &str) -> bool {
    email.starts_with(RETIRED_EMAIL_PREFIX)
        && email.ends_with(&format!("@{}", RETIRED_EMAIL_DOMAIN))
}
