//! Branch entity.

use sea_orm::entity::prelude::*;

use crate::domain::Branch;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "branches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub sol_id: String,
    pub name: String,
    pub active: bool,
    pub deleted: bool,
    pub created_on: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Branch {
    fn from(model: Model) -> Self {
        Branch {
            id: model.id,
            sol_id: model.sol_id,
            name: model.name,
            active: model.active,
            deleted: model.deleted,
            created_on: model.created_on,
        }
    }
}
