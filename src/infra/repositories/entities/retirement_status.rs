//! User retirement status entity.

use sea_orm::entity::prelude::*;

use crate::domain::RetirementRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_retirement_status")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// One record per user
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub original_username: String,
    pub original_email: String,
    pub original_name: String,
    pub retired_email: String,
    pub current_state: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for RetirementRecord {
    fn from(model: Model) -> Self {
        RetirementRecord {
            id: model.id,
            user_id: model.user_id,
            original_username: model.original_username,
            original_email: model.original_email,
            original_name: model.original_name,
            retired_email: model.retired_email,
            current_state: model.current_state,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
