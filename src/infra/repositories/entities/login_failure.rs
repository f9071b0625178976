//! Login failure counter entity.

use sea_orm::entity::prelude::*;

use crate::domain::LoginFailures;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "login_failures")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub failure_count: i32,
    pub lockout_until: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LoginFailures {
    fn from(model: Model) -> Self {
        LoginFailures {
            user_id: model.user_id,
            failure_count: model.failure_count,
            lockout_until: model.lockout_until,
        }
    }
}
