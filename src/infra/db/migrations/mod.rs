//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240102_000001_create_login_failures_table;
mod m20240103_000001_create_user_retirement_status;
mod m20240104_000001_create_linked_credentials;
mod m20240105_000001_unique_email_case_insensitive;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240102_000001_create_login_failures_table::Migration),
            Box::new(m20240103_000001_create_user_retirement_status::Migration),
            Box::new(m20240104_000001_create_linked_credentials::Migration),
            Box::new(m20240105_000001_unique_email_case_insensitive::Migration),
        ]
    }
}
