//! Database connection and initialization.

use sea_orm::{ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;

use crate::config::Config;

pub mod migrations;

pub use migrations::Migrator;

/// One row of `migrate status` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationState {
    pub name: String,
    pub applied: bool,
}

impl MigrationState {
    pub fn label(&self) -> &'static str {
        if self.applied {
            "applied"
        } else {
            "pending"
        }
    }
}

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Initialize database connection and run migrations.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let connection = SeaDatabase::connect(&config.database_url).await?;

        // Run pending migrations
        Migrator::up(&connection, None).await?;
        tracing::info!("Database connected and migrations applied");

        Ok(Self { connection })
    }

    /// Connect without running migrations (for CLI commands).
    pub async fn connect_without_migrations(config: &Config) -> Result<Self, DbErr> {
        let connection = SeaDatabase::connect(&config.database_url).await?;
        Ok(Self { connection })
    }

    /// Wrap an existing connection (tests, embedding).
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Run pending migrations.
    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Rollback the last migration.
    pub async fn rollback_migration(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// List every known migration with whether it has been applied.
    pub async fn migration_status(&self) -> Result<Vec<MigrationState>, DbErr> {
        use sea_orm::{EntityTrait, QueryOrder};
        use sea_orm_migration::seaql_migrations;

        let applied: std::collections::HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        Ok(Migrator::migrations()
            .iter()
            .map(|m| MigrationState {
                applied: applied.contains(m.name()),
                name: m.name().to_string(),
            })
            .collect())
    }

    /// Reset database and run all migrations fresh.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One pooled connection; each new in-memory connection is a new database
    async fn sqlite() -> Database {
        let mut opts = sea_orm::ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        Database::from_connection(SeaDatabase::connect(opts).await.unwrap())
    }

    #[tokio::test]
    async fn test_status_tracks_up_and_down() {
        let db = sqlite().await;

        let before = db.migration_status().await;
        // The bookkeeping table only exists once the migrator has run
        assert!(before.is_err() || before.unwrap().iter().all(|m| !m.applied));

        db.run_migrations().await.unwrap();
        let status = db.migration_status().await.unwrap();
        assert!(!status.is_empty());
        assert!(status.iter().all(|m| m.applied));

        db.rollback_migration().await.unwrap();
        let status = db.migration_status().await.unwrap();
        assert_eq!(status.last().map(MigrationState::label), Some("pending"));
        assert_eq!(status.iter().filter(|m| !m.applied).count(), 1);
    }

    #[tokio::test]
    async fn test_fresh_rebuilds_every_table() {
        let db = sqlite().await;
        db.run_migrations().await.unwrap();
        db.rollback_migration().await.unwrap();

        // Drops by listing the backend's tables, which needs its driver feature
        db.fresh_migrations().await.unwrap();
        let status = db.migration_status().await.unwrap();
        assert!(status.iter().all(|m| m.applied));
    }

    #[tokio::test]
    async fn test_ping_succeeds_on_live_connection() {
        assert!(sqlite().await.ping().await.is_ok());
    }
}
