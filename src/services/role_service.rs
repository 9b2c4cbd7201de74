//! Role service - role lifecycle and the Role↔PermissionSet edge.
//!
//! Grant/deny resolve the requested set ids against the store first; when
//! none resolve, a second audit entry records the empty match and the call
//! fails with `NotFound`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{NewRole, PermissionSet, Role, UpdateRole};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{PermissionSetRepository, RoleRepository};

use super::audit_service::AuditService;

#[async_trait]
pub trait RoleService: Send + Sync {
    /// Internal lookup, not audited.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>>;

    async fn get_by_id(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<Role>;
    async fn get_by_name(&self, actor_id: i64, origin_ip: &str, name: &str) -> AppResult<Role>;
    async fn list_all(&self, actor_id: i64, origin_ip: &str) -> AppResult<Vec<Role>>;
    async fn create(&self, actor_id: i64, origin_ip: &str, role: NewRole) -> AppResult<Role>;
    async fn update(&self, actor_id: i64, origin_ip: &str, role: UpdateRole) -> AppResult<Role>;
    async fn grant_permission_sets(
        &self,
        actor_id: i64,
        origin_ip: &str,
        role_id: i64,
        set_ids: Vec<i64>,
    ) -> AppResult<Vec<PermissionSet>>;
    async fn deny_permission_sets(
        &self,
        actor_id: i64,
        origin_ip: &str,
        role_id: i64,
        set_ids: Vec<i64>,
    ) -> AppResult<()>;
    async fn permission_sets_of(
        &self,
        actor_id: i64,
        origin_ip: &str,
        role_id: i64,
    ) -> AppResult<Vec<PermissionSet>>;
    async fn soft_delete(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<()>;
    async fn purge(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<()>;

    async fn exists_by_id(&self, id: i64) -> AppResult<bool>;
    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;
    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool>;
}

pub struct RoleManager {
    roles: Arc<dyn RoleRepository>,
    sets: Arc<dyn PermissionSetRepository>,
    auditor: Arc<dyn AuditService>,
}

impl RoleManager {
    pub fn new(
        roles: Arc<dyn RoleRepository>,
        sets: Arc<dyn PermissionSetRepository>,
        auditor: Arc<dyn AuditService>,
    ) -> Self {
        Self {
            roles,
            sets,
            auditor,
        }
    }

    async fn require_role(&self, id: i64) -> AppResult<Role> {
        self.roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Role", "Id", id))
    }

    /// Resolve requested set ids against the store, dropping soft-deleted
    /// sets. Live subset only.
    async fn resolve_sets(&self, set_ids: Vec<i64>) -> AppResult<Vec<PermissionSet>> {
        let sets = self.sets.find_by_ids(set_ids).await?;
        Ok(sets.into_iter().filter(|s| !s.deleted).collect())
    }
}

#[async_trait]
impl RoleService for RoleManager {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>> {
        self.roles.find_by_id(id).await
    }

    async fn get_by_id(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<Role> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let role = self.require_role(id).await?;
        self.auditor
            .record(&actor, format!("Retrieved role '{}'", role.name), origin_ip)
            .await?;
        Ok(role)
    }

    async fn get_by_name(&self, actor_id: i64, origin_ip: &str, name: &str) -> AppResult<Role> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let role = self
            .roles
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::not_found("Role", "Name", name))?;
        self.auditor
            .record(
                &actor,
                format!("Retrieved role with name '{}'", name),
                origin_ip,
            )
            .await?;
        Ok(role)
    }

    async fn list_all(&self, actor_id: i64, origin_ip: &str) -> AppResult<Vec<Role>> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let roles = self.roles.find_all().await?;
        self.auditor
            .record(&actor, "Retrieved all roles".to_string(), origin_ip)
            .await?;
        Ok(roles)
    }

    async fn create(&self, actor_id: i64, origin_ip: &str, role: NewRole) -> AppResult<Role> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let created = self.roles.insert(role).await?;
        self.auditor
            .record(&actor, format!("Created role '{}'", created.name), origin_ip)
            .await?;
        Ok(created)
    }

    async fn update(&self, actor_id: i64, origin_ip: &str, changes: UpdateRole) -> AppResult<Role> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let mut role = self.require_role(changes.id).await?;
        if role.deleted {
            return Err(AppError::not_active("Role", "Id", changes.id));
        }
        role.name = changes.name;
        role.description = changes.description;
        let updated = self.roles.update(&role).await?;
        self.auditor
            .record(&actor, format!("Updated role '{}'", updated.name), origin_ip)
            .await?;
        Ok(updated)
    }

    async fn grant_permission_sets(
        &self,
        actor_id: i64,
        origin_ip: &str,
        role_id: i64,
        set_ids: Vec<i64>,
    ) -> AppResult<Vec<PermissionSet>> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let role = self.require_role(role_id).await?;
        self.auditor
            .record(
                &actor,
                format!("Granting permission sets to role '{}'", role.name),
                origin_ip,
            )
            .await?;
        let resolved = self.resolve_sets(set_ids).await?;
        if resolved.is_empty() {
            self.auditor
                .record(
                    &actor,
                    format!(
                        "No permission sets matched the grant request for role '{}'",
                        role.name
                    ),
                    origin_ip,
                )
                .await?;
            return Err(AppError::not_found("PermissionSet", "Id", "requested ids"));
        }
        let ids: Vec<i64> = resolved.iter().map(|s| s.id).collect();
        self.roles.add_permission_sets(role_id, ids).await?;
        self.auditor
            .record(
                &actor,
                format!(
                    "Granted {} permission set(s) to role '{}'",
                    resolved.len(),
                    role.name
                ),
                origin_ip,
            )
            .await?;
        Ok(resolved)
    }

    async fn deny_permission_sets(
        &self,
        actor_id: i64,
        origin_ip: &str,
        role_id: i64,
        set_ids: Vec<i64>,
    ) -> AppResult<()> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let role = self.require_role(role_id).await?;
        self.auditor
            .record(
                &actor,
                format!("Denying permission sets for role '{}'", role.name),
                origin_ip,
            )
            .await?;
        let resolved = self.resolve_sets(set_ids).await?;
        if resolved.is_empty() {
            self.auditor
                .record(
                    &actor,
                    format!(
                        "No permission sets matched the deny request for role '{}'",
                        role.name
                    ),
                    origin_ip,
                )
                .await?;
            return Err(AppError::not_found("PermissionSet", "Id", "requested ids"));
        }
        let ids: Vec<i64> = resolved.iter().map(|s| s.id).collect();
        self.roles.remove_permission_sets(role_id, ids).await?;
        self.auditor
            .record(
                &actor,
                format!(
                    "Denied {} permission set(s) for role '{}'",
                    resolved.len(),
                    role.name
                ),
                origin_ip,
            )
            .await?;
        Ok(())
    }

    async fn permission_sets_of(
        &self,
        actor_id: i64,
        origin_ip: &str,
        role_id: i64,
    ) -> AppResult<Vec<PermissionSet>> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let role = self.require_role(role_id).await?;
        let sets = self.roles.permission_sets_of(role_id).await?;
        let live: Vec<PermissionSet> = sets.into_iter().filter(|s| !s.deleted).collect();
        self.auditor
            .record(
                &actor,
                format!("Retrieved permission sets of role '{}'", role.name),
                origin_ip,
            )
            .await?;
        Ok(live)
    }

    async fn soft_delete(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<()> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let mut role = self.require_role(id).await?;
        role.deleted = true;
        let deleted = self.roles.update(&role).await?;
        self.auditor
            .record(&actor, format!("Deleted role '{}'", deleted.name), origin_ip)
            .await?;
        Ok(())
    }

    async fn purge(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<()> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let role = self.require_role(id).await?;
        self.roles.delete_by_id(id).await?;
        self.auditor
            .record(&actor, format!("Purged role '{}'", role.name), origin_ip)
            .await?;
        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        self.roles.exists_by_id(id).await
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        self.roles.exists_by_name(name).await
    }

    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool> {
        self.roles.exists_by_name_excluding(name, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::{
        MockAuditLogRepository, MockPermissionSetRepository, MockRoleRepository,
        MockUserRepository,
    };
    use crate::services::audit_service::Auditor;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

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

    fn role(id: i64) -> Role {
        Role {
            id,
            name: "Teller".into(),
            description: None,
            deleted: false,
        }
    }

    #[tokio::test]
    async fn grant_with_no_matching_sets_records_second_entry_and_fails() {
        static INSERTED: AtomicUsize = AtomicUsize::new(0);

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(Some(actor())));
        let mut logs = MockAuditLogRepository::new();
        logs.expect_insert().returning(|entry| {
            INSERTED.fetch_add(1, Ordering::SeqCst);
            Ok(crate::domain::AuditLog {
                id: 1,
                action: entry.action,
                ip_address: entry.ip_address,
                logged_at: entry.logged_at,
                user_id: entry.user_id,
            })
        });

        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id().returning(|id| Ok(Some(role(id))));
        roles.expect_add_permission_sets().times(0);

        let mut sets = MockPermissionSetRepository::new();
        sets.expect_find_by_ids().returning(|_| Ok(Vec::new()));

        let service = RoleManager::new(
            Arc::new(roles),
            Arc::new(sets),
            Arc::new(Auditor::new(Arc::new(users), Arc::new(logs))),
        );
        let err = service
            .grant_permission_sets(1, "10.0.0.1", 5, vec![90, 91])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(INSERTED.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn grant_filters_deleted_sets() {
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

        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id().returning(|id| Ok(Some(role(id))));
        roles
            .expect_add_permission_sets()
            .withf(|_, ids| ids == &vec![10])
            .returning(|_, _| Ok(()));

        let mut sets = MockPermissionSetRepository::new();
        sets.expect_find_by_ids().returning(|_| {
            Ok(vec![
                PermissionSet {
                    id: 10,
                    name: "Open".into(),
                    description: None,
                    locked: false,
                    deleted: false,
                },
                PermissionSet {
                    id: 11,
                    name: "Gone".into(),
                    description: None,
                    locked: false,
                    deleted: true,
                },
            ])
        });

        let service = RoleManager::new(
            Arc::new(roles),
            Arc::new(sets),
            Arc::new(Auditor::new(Arc::new(users), Arc::new(logs))),
        );
        let granted = service
            .grant_permission_sets(1, "10.0.0.1", 5, vec![10, 11])
            .await
            .unwrap();
        assert_eq!(granted.len(), 1);
        assert_eq!(granted[0].id, 10);
    }
}
