//! User repository: trait + SeaORM store.
//!
//! Username and PF-number lookups are case-insensitive. Duplicate checks
//! come in a global form and an excluding-id form for updates.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set, Unchanged},
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

use crate::domain::{NewUser, User};
use crate::errors::AppResult;

use super::entities::user::{ActiveModel, Column, Entity};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn find_by_pf_no(&self, pf_no: &str) -> AppResult<Option<User>>;
    async fn find_all(&self) -> AppResult<Vec<User>>;
    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;
    async fn exists_by_username_excluding(&self, username: &str, id: i64) -> AppResult<bool>;
    async fn exists_by_pf_no(&self, pf_no: &str) -> AppResult<bool>;
    async fn exists_by_pf_no_excluding(&self, pf_no: &str, id: i64) -> AppResult<bool>;
    async fn insert(&self, user: NewUser) -> AppResult<User>;
    async fn update(&self, user: &User) -> AppResult<User>;
}

/// SeaORM-backed store.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn username_matches(username: &str) -> sea_orm::sea_query::SimpleExpr {
        Expr::expr(Func::lower(Expr::col(Column::Username))).eq(username.to_lowercase())
    }

    fn pf_no_matches(pf_no: &str) -> sea_orm::sea_query::SimpleExpr {
        Expr::expr(Func::lower(Expr::col(Column::PfNo))).eq(pf_no.to_lowercase())
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let found = Entity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let found = Entity::find()
            .filter(Self::username_matches(username))
            .one(&self.db)
            .await?;
        Ok(found.map(Into::into))
    }

    async fn find_by_pf_no(&self, pf_no: &str) -> AppResult<Option<User>> {
        let found = Entity::find()
            .filter(Self::pf_no_matches(pf_no))
            .one(&self.db)
            .await?;
        Ok(found.map(Into::into))
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let rows = Entity::find().all(&self.db).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        let count = Entity::find()
            .filter(Self::username_matches(username))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn exists_by_username_excluding(&self, username: &str, id: i64) -> AppResult<bool> {
        let count = Entity::find()
            .filter(Self::username_matches(username))
            .filter(Column::Id.ne(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn exists_by_pf_no(&self, pf_no: &str) -> AppResult<bool> {
        let count = Entity::find()
            .filter(Self::pf_no_matches(pf_no))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn exists_by_pf_no_excluding(&self, pf_no: &str, id: i64) -> AppResult<bool> {
        let count = Entity::find()
            .filter(Self::pf_no_matches(pf_no))
            .filter(Column::Id.ne(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let model = ActiveModel {
            id: NotSet,
            username: Set(user.username),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            gender: Set(user.gender),
            pf_no: Set(user.pf_no),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            branch_id: Set(user.branch_id),
            role_id: Set(user.role_id),
            active: Set(false),
            verified: Set(false),
            deleted: Set(false),
            logged_in: Set(false),
            verified_by: Set(None),
            created_by: Set(user.created_by),
            created_on: Set(now),
            modified_by: Set(None),
            modified_on: Set(now),
        };
        let inserted = model.insert(&self.db).await?;
        Ok(inserted.into())
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let model = ActiveModel {
            id: Unchanged(user.id),
            username: Set(user.username.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            gender: Set(user.gender.clone()),
            pf_no: Set(user.pf_no.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            branch_id: Set(user.branch_id),
            role_id: Set(user.role_id),
            active: Set(user.active),
            verified: Set(user.verified),
            deleted: Set(user.deleted),
            logged_in: Set(user.logged_in),
            verified_by: Set(user.verified_by.clone()),
            created_by: Set(user.created_by.clone()),
            created_on: Set(user.created_on),
            modified_by: Set(user.modified_by.clone()),
            modified_on: Set(user.modified_on),
        };
        let updated = model.update(&self.db).await?;
        Ok(updated.into())
    }
}
