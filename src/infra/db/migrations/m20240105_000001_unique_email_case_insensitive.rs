//! Migration: Make email uniqueness case-insensitive.
//!
//! Retired placeholders are derived from the lowercased address, so two
//! live accounts must never share an address up to case.

use sea_orm_migration::prelude::*;

const INDEX_NAME: &str = "idx_users_email_lower";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Expression index; same syntax on Postgres and SQLite
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {} ON users (lower(email))",
                INDEX_NAME
            ))
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(INDEX_NAME).table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
}
