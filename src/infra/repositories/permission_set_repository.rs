//! Permission set repository: trait + SeaORM store.
//!
//! Owns the PermissionSet↔Permission edge.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, OnConflict};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set, Unchanged},
    ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
};

use crate::domain::{NewPermissionSet, Permission, PermissionSet};
use crate::errors::AppResult;

use super::entities::permission_set::{ActiveModel, Column, Entity};
use super::entities::{permission_set_permission, PermissionEntity};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionSetRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<PermissionSet>>;
    async fn find_by_name(&self, name: &str) -> AppResult<Option<PermissionSet>>;
    async fn find_by_ids(&self, ids: Vec<i64>) -> AppResult<Vec<PermissionSet>>;
    async fn find_all(&self) -> AppResult<Vec<PermissionSet>>;
    async fn exists_by_id(&self, id: i64) -> AppResult<bool>;
    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;
    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool>;
    async fn insert(&self, set: NewPermissionSet) -> AppResult<PermissionSet>;
    async fn update(&self, set: &PermissionSet) -> AppResult<PermissionSet>;
    async fn delete_by_id(&self, id: i64) -> AppResult<()>;
    async fn permissions_of(&self, set_id: i64) -> AppResult<Vec<Permission>>;
    async fn add_permissions(&self, set_id: i64, permission_ids: Vec<i64>) -> AppResult<()>;
    async fn remove_permissions(&self, set_id: i64, permission_ids: Vec<i64>) -> AppResult<()>;
}

pub struct PermissionSetStore {
    db: DatabaseConnection,
}

impl PermissionSetStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn name_matches(name: &str) -> sea_orm::sea_query::SimpleExpr {
        Expr::expr(Func::lower(Expr::col(Column::Name))).eq(name.to_lowercase())
    }
}

#[async_trait]
impl PermissionSetRepository for PermissionSetStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<PermissionSet>> {
        let found = Entity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<PermissionSet>> {
        let found = Entity::find()
            .filter(Self::name_matches(name))
            .one(&self.db)
            .await?;
        Ok(found.map(Into::into))
    }

    async fn find_by_ids(&self, ids: Vec<i64>) -> AppResult<Vec<PermissionSet>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = Entity::find()
            .filter(Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_all(&self) -> AppResult<Vec<PermissionSet>> {
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

    async fn insert(&self, set: NewPermissionSet) -> AppResult<PermissionSet> {
        let model = ActiveModel {
            id: NotSet,
            name: Set(set.name),
            description: Set(set.description),
            locked: Set(set.locked),
            deleted: Set(false),
        };
        let inserted = model.insert(&self.db).await?;
        Ok(inserted.into())
    }

    async fn update(&self, set: &PermissionSet) -> AppResult<PermissionSet> {
        let model = ActiveModel {
            id: Unchanged(set.id),
            name: Set(set.name.clone()),
            description: Set(set.description.clone()),
            locked: Set(set.locked),
            deleted: Set(set.deleted),
        };
        let updated = model.update(&self.db).await?;
        Ok(updated.into())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn permissions_of(&self, set_id: i64) -> AppResult<Vec<Permission>> {
        let set = match Entity::find_by_id(set_id).one(&self.db).await? {
            Some(set) => set,
            None => return Ok(Vec::new()),
        };
        let permissions = set.find_related(PermissionEntity).all(&self.db).await?;
        Ok(permissions.into_iter().map(Into::into).collect())
    }

    async fn add_permissions(&self, set_id: i64, permission_ids: Vec<i64>) -> AppResult<()> {
        if permission_ids.is_empty() {
            return Ok(());
        }
        let rows = permission_ids
            .into_iter()
            .map(|permission_id| permission_set_permission::ActiveModel {
                permission_set_id: Set(set_id),
                permission_id: Set(permission_id),
            });
        permission_set_permission::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    permission_set_permission::Column::PermissionSetId,
                    permission_set_permission::Column::PermissionId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn remove_permissions(&self, set_id: i64, permission_ids: Vec<i64>) -> AppResult<()> {
        if permission_ids.is_empty() {
            return Ok(());
        }
        permission_set_permission::Entity::delete_many()
            .filter(permission_set_permission::Column::PermissionSetId.eq(set_id))
            .filter(permission_set_permission::Column::PermissionId.is_in(permission_ids))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
