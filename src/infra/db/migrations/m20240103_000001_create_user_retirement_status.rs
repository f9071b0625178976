//! Migration: Create retirement status table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserRetirementStatus::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserRetirementStatus::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // Unique: at most one retirement per user
                    .col(
                        ColumnDef::new(UserRetirementStatus::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(UserRetirementStatus::OriginalUsername).string().not_null())
                    .col(ColumnDef::new(UserRetirementStatus::OriginalEmail).string().not_null())
                    .col(ColumnDef::new(UserRetirementStatus::OriginalName).string().not_null())
                    .col(ColumnDef::new(UserRetirementStatus::RetiredEmail).string().not_null())
                    .col(ColumnDef::new(UserRetirementStatus::CurrentState).string().not_null())
                    .col(
                        ColumnDef::new(UserRetirementStatus::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserRetirementStatus::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserRetirementStatus::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserRetirementStatus {
    Table,
    Id,
    UserId,
    OriginalUsername,
    OriginalEmail,
    OriginalName,
    RetiredEmail,
    CurrentState,
    CreatedAt,
    UpdatedAt,
}
