//! Role repository: trait + SeaORM store.
//!
//! Owns the Role↔PermissionSet edge. Granting an already-granted set is a
//! no-op (insert on conflict does nothing).

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, OnConflict};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set, Unchanged},
    ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
};

use crate::domain::{NewRole, PermissionSet, Role};
use crate::errors::AppResult;

use super::entities::role::{ActiveModel, Column, Entity};
use super::entities::{role_permission_set, PermissionSetEntity};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>>;
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;
    async fn find_all(&self) -> AppResult<Vec<Role>>;
    async fn exists_by_id(&self, id: i64) -> AppResult<bool>;
    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;
    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool>;
    async fn insert(&self, role: NewRole) -> AppResult<Role>;
    async fn update(&self, role: &Role) -> AppResult<Role>;
    async fn delete_by_id(&self, id: i64) -> AppResult<()>;
    async fn permission_sets_of(&self, role_id: i64) -> AppResult<Vec<PermissionSet>>;
    async fn add_permission_sets(&self, role_id: i64, set_ids: Vec<i64>) -> AppResult<()>;
    async fn remove_permission_sets(&self, role_id: i64, set_ids: Vec<i64>) -> AppResult<()>;
}

pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn name_matches(name: &str) -> sea_orm::sea_query::SimpleExpr {
        Expr::expr(Func::lower(Expr::col(Column::Name))).eq(name.to_lowercase())
    }
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>> {
        let found = Entity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let found = Entity::find()
            .filter(Self::name_matches(name))
            .one(&self.db)
            .await?;
        Ok(found.map(Into::into))
    }

    async fn find_all(&self) -> AppResult<Vec<Role>> {
        let rows = Entity::find().all(&self.db).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        let count = Entity::find()
            .filter(Column::Id.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        let count = Entity::find()
            .filter(Self::name_matches(name))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool> {
        let count = Entity::find()
            .filter(Self::name_matches(name))
            .filter(Column::Id.ne(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn insert(&self, role: NewRole) -> AppResult<Role> {
        let model = ActiveModel {
            id: NotSet,
            name: Set(role.name),
            description: Set(role.description),
            deleted: Set(false),
        };
        let inserted = model.insert(&self.db).await?;
        Ok(inserted.into())
    }

    async fn update(&self, role: &Role) -> AppResult<Role> {
        let model = ActiveModel {
            id: Unchanged(role.id),
            name: Set(role.name.clone()),
            description: Set(role.description.clone()),
            deleted: Set(role.deleted),
        };
        let updated = model.update(&self.db).await?;
        Ok(updated.into())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn permission_sets_of(&self, role_id: i64) -> AppResult<Vec<PermissionSet>> {
        let role = match Entity::find_by_id(role_id).one(&self.db).await? {
            Some(role) => role,
            None => return Ok(Vec::new()),
        };
        let sets = role
            .find_related(PermissionSetEntity)
            .all(&self.db)
            .await?;
        Ok(sets.into_iter().map(Into::into).collect())
    }

    async fn add_permission_sets(&self, role_id: i64, set_ids: Vec<i64>) -> AppResult<()> {
        if set_ids.is_empty() {
            return Ok(());
        }
        let rows = set_ids.into_iter().map(|set_id| role_permission_set::ActiveModel {
            role_id: Set(role_id),
            permission_set_id: Set(set_id),
        });
        role_permission_set::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    role_permission_set::Column::RoleId,
                    role_permission_set::Column::PermissionSetId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn remove_permission_sets(&self, role_id: i64, set_ids: Vec<i64>) -> AppResult<()> {
        if set_ids.is_empty() {
            return Ok(());
        }
        role_permission_set::Entity::delete_many()
            .filter(role_permission_set::Column::RoleId.eq(role_id))
            .filter(role_permission_set::Column::PermissionSetId.is_in(set_ids))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
