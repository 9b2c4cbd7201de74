//! Branch repository: trait + SeaORM store.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set, Unchanged},
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

use crate::domain::{Branch, NewBranch};
use crate::errors::AppResult;

use super::entities::branch::{ActiveModel, Column, Entity};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BranchRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Branch>>;
    async fn find_by_sol_id(&self, sol_id: &str) -> AppResult<Option<Branch>>;
    async fn find_all(&self) -> AppResult<Vec<Branch>>;
    async fn exists_by_id(&self, id: i64) -> AppResult<bool>;
    async fn exists_by_sol_id(&self, sol_id: &str) -> AppResult<bool>;
    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;
    async fn exists_by_sol_id_excluding(&self, sol_id: &str, id: i64) -> AppResult<bool>;
    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool>;
    async fn insert(&self, branch: NewBranch) -> AppResult<Branch>;
    async fn update(&self, branch: &Branch) -> AppResult<Branch>;
    async fn delete_by_id(&self, id: i64) -> AppResult<()>;
}

pub struct BranchStore {
    db: DatabaseConnection,
}

impl BranchStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn name_matches(name: &str) -> sea_orm::sea_query::SimpleExpr {
        Expr::expr(Func::lower(Expr::col(Column::Name))).eq(name.to_lowercase())
    }
}

#[async_trait]
impl BranchRepository for BranchStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Branch>> {
        let found = Entity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(Into::into))
    }

    async fn find_by_sol_id(&self, sol_id: &str) -> AppResult<Option<Branch>> {
        let found = Entity::find()
            .filter(Column::SolId.eq(sol_id))
            .one(&self.db)
            .await?;
        Ok(found.map(Into::into))
    }

    async fn find_all(&self) -> AppResult<Vec<Branch>> {
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

    async fn exists_by_sol_id(&self, sol_id: &str) -> AppResult<bool> {
        let count = Entity::find()
            .filter(Column::SolId.eq(sol_id))
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

    async fn exists_by_sol_id_excluding(&self, sol_id: &str, id: i64) -> AppResult<bool> {
        let count = Entity::find()
            .filter(Column::SolId.eq(sol_id))
            .filter(Column::Id.ne(id))
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

    async fn insert(&self, branch: NewBranch) -> AppResult<Branch> {
        let model = ActiveModel {
            id: NotSet,
            sol_id: Set(branch.sol_id),
            name: Set(branch.name),
            active: Set(branch.active),
            deleted: Set(false),
            created_on: Set(Utc::now()),
        };
        let inserted = model.insert(&self.db).await?;
        Ok(inserted.into())
    }

    async fn update(&self, branch: &Branch) -> AppResult<Branch> {
        let model = ActiveModel {
            id: Unchanged(branch.id),
            sol_id: Set(branch.sol_id.clone()),
            name: Set(branch.name.clone()),
            active: Set(branch.active),
            deleted: Set(branch.deleted),
            created_on: Set(branch.created_on),
        };
        let updated = model.update(&self.db).await?;
        Ok(updated.into())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
