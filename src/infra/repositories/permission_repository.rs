//! Permission catalog repository: trait + SeaORM store.
//!
//! The catalog has no create/delete path here; lock state is written in bulk
//! by the set-level cascades.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{Set, Unchanged},
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

use crate::domain::Permission;
use crate::errors::AppResult;

use super::entities::permission::{ActiveModel, Column, Entity};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Permission>>;
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Permission>>;
    async fn find_by_ids(&self, ids: Vec<i64>) -> AppResult<Vec<Permission>>;
    async fn find_all(&self) -> AppResult<Vec<Permission>>;
    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool>;
    async fn update(&self, permission: &Permission) -> AppResult<Permission>;
    async fn set_locked(&self, permission_ids: Vec<i64>, locked: bool) -> AppResult<()>;
}

pub struct PermissionStore {
    db: DatabaseConnection,
}

impl PermissionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn name_matches(name: &str) -> sea_orm::sea_query::SimpleExpr {
        Expr::expr(Func::lower(Expr::col(Column::Name))).eq(name.to_lowercase())
    }
}

#[async_trait]
impl PermissionRepository for PermissionStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Permission>> {
        let found = Entity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        let found = Entity::find()
            .filter(Self::name_matches(name))
            .one(&self.db)
            .await?;
        Ok(found.map(Into::into))
    }

    async fn find_by_ids(&self, ids: Vec<i64>) -> AppResult<Vec<Permission>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = Entity::find()
            .filter(Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_all(&self) -> AppResult<Vec<Permission>> {
        let rows = Entity::find().all(&self.db).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool> {
        let count = Entity::find()
            .filter(Self::name_matches(name))
            .filter(Column::Id.ne(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn update(&self, permission: &Permission) -> AppResult<Permission> {
        let model = ActiveModel {
            id: Unchanged(permission.id),
            name: Set(permission.name.clone()),
            description: Set(permission.description.clone()),
            locked: Set(permission.locked),
        };
        let updated = model.update(&self.db).await?;
        Ok(updated.into())
    }

    async fn set_locked(&self, permission_ids: Vec<i64>, locked: bool) -> AppResult<()> {
        if permission_ids.is_empty() {
            return Ok(());
        }
        Entity::update_many()
            .col_expr(Column::Locked, Expr::value(locked))
            .filter(Column::Id.is_in(permission_ids))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
