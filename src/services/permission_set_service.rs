//! Permission set service - lockable bundles with membership cascades.
//!
//! Locking a set locks every member permission; removing members unlocks
//! the removed permissions. A membership change whose requested ids resolve
//! to nothing records a second audit entry and fails with `NotFound`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{
    CreatePermissionSet, NewPermissionSet, Permission, PermissionSet, PermissionSetView,
    UpdatePermissionSet,
};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{PermissionRepository, PermissionSetRepository};

use super::audit_service::AuditService;

#[async_trait]
pub trait PermissionSetService: Send + Sync {
    /// Internal lookup, not audited.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<PermissionSet>>;

    async fn get_by_id(
        &self,
        actor_id: i64,
        origin_ip: &str,
        id: i64,
    ) -> AppResult<PermissionSetView>;
    async fn get_by_name(
        &self,
        actor_id: i64,
        origin_ip: &str,
        name: &str,
    ) -> AppResult<PermissionSetView>;
    async fn list_all(&self, actor_id: i64, origin_ip: &str) -> AppResult<Vec<PermissionSet>>;
    async fn create(
        &self,
        actor_id: i64,
        origin_ip: &str,
        set: CreatePermissionSet,
    ) -> AppResult<PermissionSetView>;
    async fn add_permissions(
        &self,
        actor_id: i64,
        origin_ip: &str,
        set_id: i64,
        permission_ids: Vec<i64>,
        lock: bool,
    ) -> AppResult<PermissionSetView>;
    async fn remove_permissions(
        &self,
        actor_id: i64,
        origin_ip: &str,
        set_id: i64,
        permission_ids: Vec<i64>,
    ) -> AppResult<PermissionSetView>;
    async fn lock(&self, actor_id: i64, origin_ip: &str, set_id: i64) -> AppResult<PermissionSetView>;
    async fn update(
        &self,
        actor_id: i64,
        origin_ip: &str,
        set: UpdatePermissionSet,
    ) -> AppResult<PermissionSet>;
    async fn soft_delete(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<()>;
    async fn purge(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<()>;

    async fn exists_by_id(&self, id: i64) -> AppResult<bool>;
    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;
    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool>;
}

pub struct PermissionSetManager {
    sets: Arc<dyn PermissionSetRepository>,
    permissions: Arc<dyn PermissionRepository>,
    auditor: Arc<dyn AuditService>,
}

impl PermissionSetManager {
    pub fn new(
        sets: Arc<dyn PermissionSetRepository>,
        permissions: Arc<dyn PermissionRepository>,
        auditor: Arc<dyn AuditService>,
    ) -> Self {
        Self {
            sets,
            permissions,
            auditor,
        }
    }

    async fn require_set(&self, id: i64) -> AppResult<PermissionSet> {
        self.sets
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("PermissionSet", "Id", id))
    }

    async fn view_of(&self, set: PermissionSet) -> AppResult<PermissionSetView> {
        let permissions = self.sets.permissions_of(set.id).await?;
        Ok(PermissionSetView::new(set, permissions))
    }
}

#[async_trait]
impl PermissionSetService for PermissionSetManager {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<PermissionSet>> {
        self.sets.find_by_id(id).await
    }

    async fn get_by_id(
        &self,
        actor_id: i64,
        origin_ip: &str,
        id: i64,
    ) -> AppResult<PermissionSetView> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let set = self.require_set(id).await?;
        self.auditor
            .record(
                &actor,
                format!("Retrieved permission set '{}'", set.name),
                origin_ip,
            )
            .await?;
        self.view_of(set).await
    }

    async fn get_by_name(
        &self,
        actor_id: i64,
        origin_ip: &str,
        name: &str,
    ) -> AppResult<PermissionSetView> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let set = self
            .sets
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::not_found("PermissionSet", "Name", name))?;
        self.auditor
            .record(
                &actor,
                format!("Retrieved permission set with name '{}'", name),
                origin_ip,
            )
            .await?;
        self.view_of(set).await
    }

    async fn list_all(&self, actor_id: i64, origin_ip: &str) -> AppResult<Vec<PermissionSet>> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let sets = self.sets.find_all().await?;
        self.auditor
            .record(&actor, "Retrieved all permission sets".to_string(), origin_ip)
            .await?;
        Ok(sets)
    }

    async fn create(
        &self,
        actor_id: i64,
        origin_ip: &str,
        set: CreatePermissionSet,
    ) -> AppResult<PermissionSetView> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let created = self
            .sets
            .insert(NewPermissionSet {
                name: set.name,
                description: set.description,
                locked: set.locked,
            })
            .await?;
        if !set.permission_ids.is_empty() {
            let resolved = self.permissions.find_by_ids(set.permission_ids).await?;
            let ids: Vec<i64> = resolved.iter().map(|p| p.id).collect();
            self.sets.add_permissions(created.id, ids.clone()).await?;
            if created.locked {
                self.permissions.set_locked(ids, true).await?;
            }
        }
        self.auditor
            .record(
                &actor,
                format!("Created permission set '{}'", created.name),
                origin_ip,
            )
            .await?;
        self.view_of(created).await
    }

    async fn add_permissions(
        &self,
        actor_id: i64,
        origin_ip: &str,
        set_id: i64,
        permission_ids: Vec<i64>,
        lock: bool,
    ) -> AppResult<PermissionSetView> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let mut set = self.require_set(set_id).await?;
        self.auditor
            .record(
                &actor,
                format!("Adding permissions to set '{}'", set.name),
                origin_ip,
            )
            .await?;
        let resolved = self.permissions.find_by_ids(permission_ids).await?;
        if resolved.is_empty() {
            self.auditor
                .record(
                    &actor,
                    format!(
                        "No permissions matched the add request for set '{}'",
                        set.name
                    ),
                    origin_ip,
                )
                .await?;
            return Err(AppError::not_found("Permission", "Id", "requested ids"));
        }
        let ids: Vec<i64> = resolved.iter().map(|p| p.id).collect();
        self.sets.add_permissions(set_id, ids).await?;
        if lock {
            set.locked = true;
            set = self.sets.update(&set).await?;
            // Lock cascades to every member, not only the ones just added
            let members = self.sets.permissions_of(set_id).await?;
            let member_ids: Vec<i64> = members.iter().map(|p| p.id).collect();
            self.permissions.set_locked(member_ids, true).await?;
        }
        self.auditor
            .record(
                &actor,
                format!(
                    "Added {} permission(s) to set '{}'",
                    resolved.len(),
                    set.name
                ),
                origin_ip,
            )
            .await?;
        self.view_of(set).await
    }

    async fn remove_permissions(
        &self,
        actor_id: i64,
        origin_ip: &str,
        set_id: i64,
        permission_ids: Vec<i64>,
    ) -> AppResult<PermissionSetView> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let set = self.require_set(set_id).await?;
        self.auditor
            .record(
                &actor,
                format!("Removing permissions from set '{}'", set.name),
                origin_ip,
            )
            .await?;
        let resolved = self.permissions.find_by_ids(permission_ids).await?;
        if resolved.is_empty() {
            self.auditor
                .record(
                    &actor,
                    format!(
                        "No permissions matched the remove request for set '{}'",
                        set.name
                    ),
                    origin_ip,
                )
                .await?;
            return Err(AppError::not_found("Permission", "Id", "requested ids"));
        }
        let ids: Vec<i64> = resolved.iter().map(|p| p.id).collect();
        self.sets.remove_permissions(set_id, ids.clone()).await?;
        // Removal releases the set's lock on the removed permissions
        self.permissions.set_locked(ids, false).await?;
        self.auditor
            .record(
                &actor,
                format!(
                    "Removed {} permission(s) from set '{}'",
                    resolved.len(),
                    set.name
                ),
                origin_ip,
            )
            .await?;
        self.view_of(set).await
    }

    async fn lock(
        &self,
        actor_id: i64,
        origin_ip: &str,
        set_id: i64,
    ) -> AppResult<PermissionSetView> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let mut set = self.require_set(set_id).await?;
        set.locked = true;
        let locked = self.sets.update(&set).await?;
        let members = self.sets.permissions_of(set_id).await?;
        let member_ids: Vec<i64> = members.iter().map(|p| p.id).collect();
        self.permissions.set_locked(member_ids, true).await?;
        self.auditor
            .record(
                &actor,
                format!("Locked permission set '{}'", locked.name),
                origin_ip,
            )
            .await?;
        self.view_of(locked).await
    }

    async fn update(
        &self,
        actor_id: i64,
        origin_ip: &str,
        changes: UpdatePermissionSet,
    ) -> AppResult<PermissionSet> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let mut set = self.require_set(changes.id).await?;
        if set.deleted {
            return Err(AppError::not_active("PermissionSet", "Id", changes.id));
        }
        set.name = changes.name;
        set.description = changes.description;
        let updated = self.sets.update(&set).await?;
        self.auditor
            .record(
                &actor,
                format!("Updated permission set '{}'", updated.name),
                origin_ip,
            )
            .await?;
        Ok(updated)
    }

    async fn soft_delete(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<()> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let mut set = self.require_set(id).await?;
        set.deleted = true;
        let deleted = self.sets.update(&set).await?;
        self.auditor
            .record(
                &actor,
                format!("Deleted permission set '{}'", deleted.name),
                origin_ip,
            )
            .await?;
        Ok(())
    }

    async fn purge(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<()> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let set = self.require_set(id).await?;
        self.sets.delete_by_id(id).await?;
        self.auditor
            .record(
                &actor,
                format!("Purged permission set '{}'", set.name),
                origin_ip,
            )
            .await?;
        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        self.sets.exists_by_id(id).await
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        self.sets.exists_by_name(name).await
    }

    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool> {
        self.sets.exists_by_name_excluding(name, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::{
        MockAuditLogRepository, MockPermissionRepository, MockPermissionSetRepository,
        MockUserRepository,
    };
    use crate::services::audit_service::Auditor;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn actor() -> crate::domain::User {
        crate::domain::User {
            id: 1,
            username: "admin".into(),
            first_name: "enc".into(),
            last_name: "enc".into(),
            gender: "F".into(),
            pf_no: "PF001".into(),
            email: "enc".into(),
            password_hash: "hash".into(),
            branch_id: 1,
            role_id: 1,
            active: true,
            verified: true,
            deleted: false,
            logged_in: false,
            verified_by: None,
            created_by: "root".into(),
            created_on: Utc::now(),
            modified_by: None,
            modified_on: Utc::now(),
        }
    }

    fn set(id: i64, locked: bool) -> PermissionSet {
        PermissionSet {
            id,
            name: "Payments".into(),
            description: None,
            locked,
            deleted: false,
        }
    }

    fn permission(id: i64, locked: bool) -> Permission {
        Permission {
            id,
            name: format!("perm-{}", id),
            description: None,
            locked,
        }
    }

    fn auditor() -> Arc<Auditor> {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(Some(actor())));
        let mut logs = MockAuditLogRepository::new();
        logs.expect_insert().returning(|entry| {
            Ok(crate::domain::AuditLog {
                id: 1,
                action: entry.action,
                ip_address: entry.ip_address,
                logged_at: entry.logged_at,
                user_id: entry.user_id,
            })
        });
        Arc::new(Auditor::new(Arc::new(users), Arc::new(logs)))
    }

    #[tokio::test]
    async fn locking_a_set_locks_every_member() {
        let mut sets = MockPermissionSetRepository::new();
        sets.expect_find_by_id()
            .with(eq(4))
            .returning(|id| Ok(Some(set(id, false))));
        sets.expect_update()
            .withf(|s| s.locked)
            .returning(|s| Ok(s.clone()));
        sets.expect_permissions_of()
            .with(eq(4))
            .returning(|_| Ok(vec![permission(21, false), permission(22, false)]));

        let mut permissions = MockPermissionRepository::new();
        permissions
            .expect_set_locked()
            .withf(|ids, locked| ids == &vec![21, 22] && *locked)
            .returning(|_, _| Ok(()));

        let service =
            PermissionSetManager::new(Arc::new(sets), Arc::new(permissions), auditor());
        let view = service.lock(1, "10.0.0.1", 4).await.unwrap();
        assert!(view.locked);
    }

    #[tokio::test]
    async fn removing_members_unlocks_them() {
        let mut sets = MockPermissionSetRepository::new();
        sets.expect_find_by_id()
            .with(eq(4))
            .returning(|id| Ok(Some(set(id, true))));
        sets.expect_remove_permissions()
            .withf(|_, ids| ids == &vec![21])
            .returning(|_, _| Ok(()));
        sets.expect_permissions_of()
            .returning(|_| Ok(vec![permission(22, true)]));

        let mut permissions = MockPermissionRepository::new();
        permissions
            .expect_find_by_ids()
            .returning(|_| Ok(vec![permission(21, true)]));
        permissions
            .expect_set_locked()
            .withf(|ids, locked| ids == &vec![21] && !*locked)
            .returning(|_, _| Ok(()));

        let service =
            PermissionSetManager::new(Arc::new(sets), Arc::new(permissions), auditor());
        service
            .remove_permissions(1, "10.0.0.1", 4, vec![21])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn add_with_no_matching_permissions_fails() {
        let mut sets = MockPermissionSetRepository::new();
        sets.expect_find_by_id()
            .returning(|id| Ok(Some(set(id, false))));
        sets.expect_add_permissions().times(0);

        let mut permissions = MockPermissionRepository::new();
        permissions.expect_find_by_ids().returning(|_| Ok(Vec::new()));

        let service =
            PermissionSetManager::new(Arc::new(sets), Arc::new(permissions), auditor());
        let err = service
            .add_permissions(1, "10.0.0.1", 4, vec![99], false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
