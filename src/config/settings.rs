//! Application settings loaded from environment variables.

use std::env;

use chrono::Duration;

use super::constants::{
    DEFAULT_CONTACT_EMAIL, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_LOCKOUT_ENABLED, DEFAULT_LOCKOUT_PERIOD_SECS, DEFAULT_MAX_FAILED_LOGIN_ATTEMPTS,
    DEFAULT_PLATFORM_NAME, DEFAULT_RETIRED_USER_SALT, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_SMTP_FROM, DEFAULT_SMTP_PORT, MIN_JWT_SECRET_LENGTH,
};

/// Login failure lockout settings.
///
/// Passed explicitly into the lockout service instead of being read
/// from a global flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutSettings {
    pub enabled: bool,
    pub max_attempts: i32,
    pub period_secs: i64,
}

impl LockoutSettings {
    /// Lockout tracking switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Lockout window as a chrono duration.
    pub fn period(&self) -> Duration {
        Duration::seconds(self.period_secs)
    }

    /// Lockout window rounded up to whole minutes (for user-facing messages).
    pub fn period_minutes(&self) -> i64 {
        (self.period_secs + 59) / 60
    }
}

impl Default for LockoutSettings {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_LOCKOUT_ENABLED,
            max_attempts: DEFAULT_MAX_FAILED_LOGIN_ATTEMPTS,
            period_secs: DEFAULT_LOCKOUT_PERIOD_SECS,
        }
    }
}

/// SMTP delivery settings. Without a host, mail is logged instead of sent.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pass: Option<String>,
    pub from: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass", &"[REDACTED]")
            .field("from", &self.from)
            .finish()
    }
}

impl SmtpSettings {
    pub fn new(host: Option<String>, port: u16, user: Option<String>, pass: Option<String>, from: String) -> Self {
        Self {
            host,
            port,
            user,
            pass,
            from,
        }
    }

    /// Settings with no SMTP host: every message is logged.
    pub fn log_only() -> Self {
        Self::new(None, DEFAULT_SMTP_PORT, None, None, DEFAULT_SMTP_FROM.to_string())
    }

    pub fn is_configured(&self) -> bool {
        self.host.is_some()
    }

    pub fn password(&self) -> Option<&str> {
        self.pass.as_deref()
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub lockout: LockoutSettings,
    /// Salts for retired email hashing, oldest first. The last one is current.
    retired_user_salts: Vec<String>,
    pub platform_name: String,
    pub contact_email: String,
    pub smtp: SmtpSettings,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("lockout", &self.lockout)
            .field("retired_user_salts", &"[REDACTED]")
            .field("platform_name", &self.platform_name)
            .field("contact_email", &self.contact_email)
            .field("smtp", &self.smtp)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement),
    /// or if RETIRED_USER_SALTS is not set in a release build.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let retired_user_salts = match env::var("RETIRED_USER_SALTS") {
            Ok(raw) => parse_salts(&raw),
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("RETIRED_USER_SALTS not set, using insecure default for development");
                vec![DEFAULT_RETIRED_USER_SALT.to_string()]
            }
            Err(_) => panic!("RETIRED_USER_SALTS environment variable must be set in production"),
        };

        if retired_user_salts.is_empty() {
            panic!("RETIRED_USER_SALTS must contain at least one salt");
        }

        let lockout = LockoutSettings {
            enabled: env::var("LOCKOUT_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(DEFAULT_LOCKOUT_ENABLED),
            max_attempts: parse_env("MAX_FAILED_LOGIN_ATTEMPTS_ALLOWED")
                .unwrap_or(DEFAULT_MAX_FAILED_LOGIN_ATTEMPTS),
            period_secs: parse_env("MAX_FAILED_LOGIN_ATTEMPTS_LOCKOUT_PERIOD_SECS")
                .unwrap_or(DEFAULT_LOCKOUT_PERIOD_SECS),
        };

        let smtp = SmtpSettings::new(
            env::var("SMTP_HOST").ok(),
            parse_env("SMTP_PORT").unwrap_or(DEFAULT_SMTP_PORT),
            env::var("SMTP_USER").ok(),
            env::var("SMTP_PASS").ok(),
            env::var("SMTP_FROM").unwrap_or_else(|_| DEFAULT_SMTP_FROM.to_string()),
        );

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: parse_env("JWT_EXPIRATION_HOURS")
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_env("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
            lockout,
            retired_user_salts,
            platform_name: env::var("PLATFORM_NAME")
                .unwrap_or_else(|_| DEFAULT_PLATFORM_NAME.to_string()),
            contact_email: env::var("CONTACT_EMAIL")
                .unwrap_or_else(|_| DEFAULT_CONTACT_EMAIL.to_string()),
            smtp,
        }
    }

    /// Deterministic configuration for tests: no environment access,
    /// log-only mail, default lockout settings.
    pub fn for_tests(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            lockout: LockoutSettings::default(),
            retired_user_salts: vec!["test-salt".to_string()],
            platform_name: DEFAULT_PLATFORM_NAME.to_string(),
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
            smtp: SmtpSettings::log_only(),
        }
    }

    /// Replace the lockout settings (builder style).
    pub fn with_lockout(mut self, lockout: LockoutSettings) -> Self {
        self.lockout = lockout;
        self
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Salt used for newly retired email addresses.
    pub fn current_retired_user_salt(&self) -> &str {
        // Non-empty is enforced at construction
        self.retired_user_salts
            .last()
            .map(String::as_str)
            .unwrap_or(DEFAULT_RETIRED_USER_SALT)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn parse_salts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_salts_keeps_order_and_skips_blanks() {
        let salts = parse_salts("old, ,newer,newest ");
        assert_eq!(salts, vec!["old", "newer", "newest"]);
    }

    #[test]
    fn test_current_salt_is_last() {
        let mut config = Config::for_tests("sqlite::memory:");
        config.retired_user_salts = vec!["a".to_string(), "b".to_string()];
        assert_eq!(config.current_retired_user_salt(), "b");
    }

    #[test]
    fn test_lockout_period_minutes_rounds_up() {
        let settings = LockoutSettings {
            enabled: true,
            max_attempts: 3,
            period_secs: 61,
        };
        assert_eq!(settings.period_minutes(), 2);
        assert_eq!(LockoutSettings::default().period_minutes(), 15);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::for_tests("postgres://user:secret@db/lms");
        let output = format!("{:?}", config);
        assert!(!output.contains("secret@db"));
        assert!(!output.contains("test-salt"));
        assert!(output.contains("[REDACTED]"));
    }
}
