//! User entity.
//!
//! `first_name`, `last_name` and `email` hold ciphertext; decryption happens
//! at the facade boundary, never here.

use sea_orm::entity::prelude::*;

use crate::domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub pf_no: String,
    pub email: String,
    pub password_hash: String,
    pub branch_id: i64,
    pub role_id: i64,
    pub active: bool,
    pub verified: bool,
    pub deleted: bool,
    pub logged_in: bool,
    pub verified_by: Option<String>,
    pub created_by: String,
    pub created_on: DateTimeUtc,
    pub modified_by: Option<String>,
    pub modified_on: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::branch::Entity",
        from = "Column::BranchId",
        to = "super::branch::Column::Id"
    )]
    Branch,
    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id"
    )]
    Role,
}

impl Related<super::branch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branch.def()
    }
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            gender: model.gender,
            pf_no: model.pf_no,
            email: model.email,
            password_hash: model.password_hash,
            branch_id: model.branch_id,
            role_id: model.role_id,
            active: model.active,
            verified: model.verified,
            deleted: model.deleted,
            logged_in: model.logged_in,
            verified_by: model.verified_by,
            created_by: model.created_by,
            created_on: model.created_on,
            modified_by: model.modified_by,
            modified_on: model.modified_on,
        }
    }
}
