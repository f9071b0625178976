//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::notification::Locale;
use super::password::Password;

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Full display name
    pub name: String,
    /// Preferred language code (e.g. "en", "zh-cn")
    pub language: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user
    pub fn new(
        id: Uuid,
        username: String,
        email: String,
        password_hash: String,
        name: String,
        language: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            password_hash,
            name,
            language,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stored credential as a value object
    pub fn password(&self) -> Password {
        Password::from_hash(self.password_hash.clone())
    }

    /// Check a plain text password against the stored credential
    pub fn check_password(&self, plain_text: &str) -> bool {
        self.password().verify(plain_text)
    }

    /// Preferred locale, falling back to the default
    pub fn locale(&self) -> Locale {
        Locale::from_code(&self.language)
    }

    /// Replace the email address
    pub fn set_email(&mut self, email: String) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    /// Invalidate the credential so it can never verify again
    pub fn set_unusable_password(&mut self) {
        self.password_hash = Password::unusable().into_string();
        self.updated_at = Utc::now();
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Login name
    #[schema(example = "alice")]
    pub username: String,
    /// User email address
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// User display name
    #[schema(example = "Alice Liddell")]
    pub name: String,
    /// Preferred language
    #[schema(example = "en")]
    pub language: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.name,
            language: user.language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_password(plain: &str) -> User {
        User::new(
            Uuid::new_v4(),
            "alice".to_string(),
            "alice@example.com".to_string(),
            Password::new(plain).unwrap().into_string(),
            "Alice".to_string(),
            "en".to_string(),
        )
    }

    #[test]
    fn test_check_password() {
        let user = user_with_password("hunter2hunter2");
        assert!(user.check_password("hunter2hunter2"));
        assert!(!user.check_password("wrong"));
    }

    #[test]
    fn test_set_unusable_password() {
        let mut user = user_with_password("hunter2hunter2");
        user.set_unusable_password();

        assert!(!user.password().is_usable());
        assert!(!user.check_password("hunter2hunter2"));
    }

    #[test]
    fn test_response_hides_password() {
        let user = user_with_password("hunter2hunter2");
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }
}
