//! Permission set entity.

use sea_orm::entity::prelude::*;

use crate::domain::PermissionSet;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "permission_sets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub locked: bool,
    pub deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::role_permission_set::Entity")]
    RoleSets,
    #[sea_orm(has_many = "super::permission_set_permission::Entity")]
    SetPermissions,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        super::role_permission_set::Relation::Role.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::role_permission_set::Relation::PermissionSet.def().rev())
    }
}

impl Related<super::permission::Entity> for Entity {
    fn to() -> RelationDef {
        super::permission_set_permission::Relation::Permission.def()
    }
    fn via() -> Option<RelationDef> {
        Some(
            super::permission_set_permission::Relation::PermissionSet
                .def()
                .rev(),
        )
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PermissionSet {
    fn from(model: Model) -> Self {
        PermissionSet {
            id: model.id,
            name: model.name,
            description: model.description,
            locked: model.locked,
            deleted: model.deleted,
        }
    }
}
