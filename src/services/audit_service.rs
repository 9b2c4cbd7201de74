//! Audit service - actor resolution and the append-only audit trail.
//!
//! Every mutating operation resolves its acting user here before touching
//! any state, then records what it did. A failed resolution aborts the
//! caller's whole operation; a failed write of the trail itself is fatal.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::{AuditLog, NewAuditLog, User};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{AuditLogRepository, UserRepository};

#[async_trait]
pub trait AuditService: Send + Sync {
    /// Resolve the acting user or fail with `NotFound` before any side effect.
    async fn require_actor(&self, actor_id: i64) -> AppResult<User>;

    /// Append one immutable entry to the trail.
    async fn record(&self, actor: &User, action: String, origin_ip: &str) -> AppResult<()>;

    /// Full audit trail, newest first. The read is itself audited.
    async fn list(&self, actor_id: i64, origin_ip: &str) -> AppResult<Vec<AuditLog>>;

    /// Audit trail within a time window, newest first. Audited.
    async fn list_between(
        &self,
        actor_id: i64,
        origin_ip: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<AuditLog>>;
}

pub struct Auditor {
    users: Arc<dyn UserRepository>,
    logs: Arc<dyn AuditLogRepository>,
}

impl Auditor {
    pub fn new(users: Arc<dyn UserRepository>, logs: Arc<dyn AuditLogRepository>) -> Self {
        Self { users, logs }
    }
}

#[async_trait]
impl AuditService for Auditor {
    async fn require_actor(&self, actor_id: i64) -> AppResult<User> {
        self.users
            .find_by_id(actor_id)
            .await?
            .ok_or_else(|| AppError::not_found("User", "Id", actor_id))
    }

    async fn record(&self, actor: &User, action: String, origin_ip: &str) -> AppResult<()> {
        tracing::debug!(actor = %actor.username, %action, "audit");
        self.logs
            .insert(NewAuditLog::now(actor.id, action, origin_ip))
            .await?;
        Ok(())
    }

    async fn list(&self, actor_id: i64, origin_ip: &str) -> AppResult<Vec<AuditLog>> {
        let actor = self.require_actor(actor_id).await?;
        let entries = self.logs.find_all().await?;
        self.record(&actor, "Retrieved the audit trail".to_string(), origin_ip)
            .await?;
        Ok(entries)
    }

    async fn list_between(
        &self,
        actor_id: i64,
        origin_ip: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<AuditLog>> {
        let actor = self.require_actor(actor_id).await?;
        let entries = self.logs.find_between(start, end).await?;
        self.record(
            &actor,
            format!("Retrieved the audit trail between {} and {}", start, end),
            origin_ip,
        )
        .await?;
        Ok(entries)
    }
}
