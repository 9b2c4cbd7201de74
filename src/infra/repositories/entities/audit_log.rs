//! Audit log entity. Append-only.

use sea_orm::entity::prelude::*;

use crate::domain::AuditLog;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub action: String,
    pub ip_address: String,
    pub logged_at: DateTimeUtc,
    pub user_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AuditLog {
    fn from(model: Model) -> Self {
        AuditLog {
            id: model.id,
            action: model.action,
            ip_address: model.ip_address,
            logged_at: model.logged_at,
            user_id: model.user_id,
        }
    }
}
