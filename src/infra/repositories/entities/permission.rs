//! Permission entity.

use sea_orm::entity::prelude::*;

use crate::domain::Permission;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "permissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub locked: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::permission_set_permission::Entity")]
    SetPermissions,
}

impl Related<super::permission_set::Entity> for Entity {
    fn to() -> RelationDef {
        super::permission_set_permission::Relation::PermissionSet.def()
    }
    fn via() -> Option<RelationDef> {
        Some(
            super::permission_set_permission::Relation::Permission
                .def()
                .rev(),
        )
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Permission {
    fn from(model: Model) -> Self {
        Permission {
            id: model.id,
            name: model.name,
            description: model.description,
            locked: model.locked,
        }
    }
}
