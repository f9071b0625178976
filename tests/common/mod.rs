//! Shared fixtures for integration tests: an in-memory SQLite database
//! with migrations applied, seed helpers, and notifier doubles.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Set,
};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use learner_retirement::config::{Config, LockoutSettings};
use learner_retirement::domain::{NotificationMessage, User};
use learner_retirement::errors::{AppError, AppResult};
use learner_retirement::infra::repositories::entities::{
    oauth_legacy_token, oauth_toolkit_token, registration, social_auth,
};
use learner_retirement::infra::{Migrator, NewUser, Notifier, Persistence, UnitOfWork};
use learner_retirement::services::Services;

/// Fresh database with every migration applied.
///
/// A single pooled connection keeps the in-memory database alive and
/// shared across repositories.
pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opts).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

/// File-backed database whose pool holds several connections, so
/// transactions on different connections genuinely overlap.
///
/// WAL mode: a writer whose snapshot is stale fails instead of waiting,
/// the same shape as a serialization failure on Postgres.
pub struct SharedDb {
    pub db: DatabaseConnection,
    path: PathBuf,
}

impl SharedDb {
    pub async fn new(connections: u32) -> Self {
        let path = std::env::temp_dir().join(format!("retirement-{}.db", Uuid::new_v4().simple()));
        let url = format!("sqlite://{}?mode=rwc", path.display());

        // journal_mode is persistent; switch it before any other connection opens
        let mut setup = ConnectOptions::new(url.clone());
        setup.max_connections(1).sqlx_logging(false);
        let conn = Database::connect(setup).await.expect("create sqlite file");
        conn.execute_unprepared("PRAGMA journal_mode=WAL")
            .await
            .expect("enable WAL");
        Migrator::up(&conn, None).await.expect("run migrations");
        conn.close().await.expect("close setup connection");

        let mut opts = ConnectOptions::new(url);
        opts.max_connections(connections)
            .min_connections(connections)
            .sqlx_logging(false);
        let db = Database::connect(opts).await.expect("connect sqlite pool");

        Self { db, path }
    }
}

impl Drop for SharedDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

pub fn test_config() -> Config {
    Config::for_tests("sqlite::memory:")
}

pub fn lockout_enabled(max_attempts: i32) -> LockoutSettings {
    LockoutSettings {
        enabled: true,
        max_attempts,
        period_secs: 900,
    }
}

/// Argon2 hash without the minimum-length rule applied to new passwords.
pub fn hash_password(plain: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .expect("hash password")
        .to_string()
}

pub async fn seed_user(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    password: &str,
    language: &str,
) -> User {
    Persistence::new(db.clone())
        .users()
        .create(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password),
            name: format!("{} Example", username),
            language: language.to_string(),
        })
        .await
        .expect("seed user")
}

pub async fn seed_social_link(db: &DatabaseConnection, user_id: Uuid, provider: &str) {
    social_auth::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        provider: Set(provider.to_string()),
        uid: Set(format!("{}-{}", provider, Uuid::new_v4().simple())),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("seed social link");
}

pub async fn seed_registration(db: &DatabaseConnection, user_id: Uuid) {
    registration::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        activation_key: Set(Uuid::new_v4().simple().to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("seed registration");
}

pub async fn seed_legacy_token(db: &DatabaseConnection, user_id: Uuid) {
    oauth_legacy_token::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        token: Set(Uuid::new_v4().simple().to_string()),
        kind: Set("access".to_string()),
        expires_at: Set(None),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("seed legacy token");
}

pub async fn seed_toolkit_token(db: &DatabaseConnection, user_id: Uuid) {
    oauth_toolkit_token::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        token: Set(Uuid::new_v4().simple().to_string()),
        kind: Set("refresh".to_string()),
        expires_at: Set(Some(Utc::now() + chrono::Duration::days(30))),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("seed toolkit token");
}

/// Notifier that records every message it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<NotificationMessage>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_deletion_notice(&self, message: &NotificationMessage) -> AppResult<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Notifier whose relay always refuses, after recording the attempt.
#[derive(Default)]
pub struct FailingNotifier {
    attempts: Mutex<Vec<NotificationMessage>>,
}

impl FailingNotifier {
    pub fn attempts(&self) -> Vec<NotificationMessage> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send_deletion_notice(&self, message: &NotificationMessage) -> AppResult<()> {
        self.attempts.lock().unwrap().push(message.clone());
        Err(AppError::notification("relay refused connection"))
    }
}

/// Services wired to the given database and notifier.
pub fn services(db: &DatabaseConnection, config: Config, notifier: Arc<dyn Notifier>) -> Services {
    Services::with_notifier(db.clone(), config, notifier)
}
