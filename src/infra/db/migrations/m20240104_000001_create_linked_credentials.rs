//! Migration: Create social links, activation keys and OAuth2 token tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SocialAuthLinks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SocialAuthLinks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SocialAuthLinks::UserId).uuid().not_null())
                    .col(ColumnDef::new(SocialAuthLinks::Provider).string().not_null())
                    .col(ColumnDef::new(SocialAuthLinks::Uid).string().not_null())
                    .col(
                        ColumnDef::new(SocialAuthLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_social_auth_links_user_id")
                    .table(SocialAuthLinks::Table)
                    .col(SocialAuthLinks::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Registrations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Registrations::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Registrations::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Registrations::ActivationKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Registrations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_registrations_user_id")
                    .table(Registrations::Table)
                    .col(Registrations::UserId)
                    .to_owned(),
            )
            .await?;

        for table in [OAuthTokens::LegacyTable, OAuthTokens::ToolkitTable] {
            create_token_table(manager, table).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [OAuthTokens::ToolkitTable, OAuthTokens::LegacyTable] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        manager
            .drop_table(Table::drop().table(Registrations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SocialAuthLinks::Table).to_owned())
            .await
    }
}

/// Both OAuth2 providers store tokens with the same shape.
async fn create_token_table(manager: &SchemaManager<'_>, table: OAuthTokens) -> Result<(), DbErr> {
    let index_name = format!("idx_{}_user_id", table.to_string());

    manager
        .create_table(
            Table::create()
                .table(table)
                .if_not_exists()
                .col(ColumnDef::new(OAuthTokens::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(OAuthTokens::UserId).uuid().not_null())
                .col(ColumnDef::new(OAuthTokens::Token).string().not_null().unique_key())
                .col(ColumnDef::new(OAuthTokens::Kind).string().not_null())
                .col(
                    ColumnDef::new(OAuthTokens::ExpiresAt)
                        .timestamp_with_time_zone()
                        .null(),
                )
                .col(
                    ColumnDef::new(OAuthTokens::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name(index_name)
                .table(table)
                .col(OAuthTokens::UserId)
                .to_owned(),
        )
        .await
}

#[derive(Iden)]
enum SocialAuthLinks {
    Table,
    Id,
    UserId,
    Provider,
    Uid,
    CreatedAt,
}

#[derive(Iden)]
enum Registrations {
    Table,
    Id,
    UserId,
    ActivationKey,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
enum OAuthTokens {
    #[iden = "oauth2_legacy_tokens"]
    LegacyTable,
    #[iden = "oauth2_toolkit_tokens"]
    ToolkitTable,
    Id,
    UserId,
    Token,
    Kind,
    ExpiresAt,
    CreatedAt,
}
