//! Audit log repository: insert and range reads only. No update or delete.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use crate::domain::{AuditLog, NewAuditLog};
use crate::errors::AppResult;

use super::entities::audit_log::{ActiveModel, Column, Entity};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn insert(&self, entry: NewAuditLog) -> AppResult<AuditLog>;
    async fn find_all(&self) -> AppResult<Vec<AuditLog>>;
    async fn find_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<AuditLog>>;
}

pub struct AuditLogStore {
    db: DatabaseConnection,
}

impl AuditLogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditLogRepository for AuditLogStore {
    async fn insert(&self, entry: NewAuditLog) -> AppResult<AuditLog> {
        let model = ActiveModel {
            id: NotSet,
            action: Set(entry.action),
            ip_address: Set(entry.ip_address),
            logged_at: Set(entry.logged_at),
            user_id: Set(entry.user_id),
        };
        let inserted = model.insert(&self.db).await?;
        Ok(inserted.into())
    }

    async fn find_all(&self) -> AppResult<Vec<AuditLog>> {
        let rows = Entity::find()
            .order_by_desc(Column::LoggedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<AuditLog>> {
        let rows = Entity::find()
            .filter(Column::LoggedAt.gte(start))
            .filter(Column::LoggedAt.lte(end))
            .order_by_desc(Column::LoggedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
