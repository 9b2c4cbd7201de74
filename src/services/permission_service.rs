//! Permission catalog service - audited reads and metadata updates.
//!
//! The catalog has no create or delete path; permissions enter and leave
//! the system outside this service. Lock state is owned by the set-level
//! cascades and is never toggled here.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Permission, UpdatePermission};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::PermissionRepository;

use super::audit_service::AuditService;

#[async_trait]
pub trait PermissionService: Send + Sync {
    async fn get_by_id(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<Permission>;
    async fn get_by_name(
        &self,
        actor_id: i64,
        origin_ip: &str,
        name: &str,
    ) -> AppResult<Permission>;
    async fn list_all(&self, actor_id: i64, origin_ip: &str) -> AppResult<Vec<Permission>>;
    async fn update(
        &self,
        actor_id: i64,
        origin_ip: &str,
        permission: UpdatePermission,
    ) -> AppResult<Permission>;
    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool>;
}

pub struct PermissionManager {
    permissions: Arc<dyn PermissionRepository>,
    auditor: Arc<dyn AuditService>,
}

impl PermissionManager {
    pub fn new(permissions: Arc<dyn PermissionRepository>, auditor: Arc<dyn AuditService>) -> Self {
        Self {
            permissions,
            auditor,
        }
    }
}

#[async_trait]
impl PermissionService for PermissionManager {
    async fn get_by_id(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<Permission> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let permission = self
            .permissions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Permission", "Id", id))?;
        self.auditor
            .record(
                &actor,
                format!("Retrieved permission '{}'", permission.name),
                origin_ip,
            )
            .await?;
        Ok(permission)
    }

    async fn get_by_name(
        &self,
        actor_id: i64,
        origin_ip: &str,
        name: &str,
    ) -> AppResult<Permission> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let permission = self
            .permissions
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::not_found("Permission", "Name", name))?;
        self.auditor
            .record(
                &actor,
                format!("Retrieved permission with name '{}'", name),
                origin_ip,
            )
            .await?;
        Ok(permission)
    }

    async fn list_all(&self, actor_id: i64, origin_ip: &str) -> AppResult<Vec<Permission>> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let permissions = self.permissions.find_all().await?;
        self.auditor
            .record(&actor, "Retrieved all permissions".to_string(), origin_ip)
            .await?;
        Ok(permissions)
    }

    async fn update(
        &self,
        actor_id: i64,
        origin_ip: &str,
        changes: UpdatePermission,
    ) -> AppResult<Permission> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let mut permission = self
            .permissions
            .find_by_id(changes.id)
            .await?
            .ok_or_else(|| AppError::not_found("Permission", "Id", changes.id))?;
        permission.name = changes.name;
        permission.description = changes.description;
        let updated = self.permissions.update(&permission).await?;
        self.auditor
            .record(
                &actor,
                format!("Updated permission '{}'", updated.name),
                origin_ip,
            )
            .await?;
        Ok(updated)
    }

    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool> {
        self.permissions.exists_by_name_excluding(name, id).await
    }
}
