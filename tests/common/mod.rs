//! In-memory repository implementations for integration tests.
//!
//! These back a fully wired facade without a database, so the tests can
//! observe end-to-end behavior including the audit trail.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use access_admin::domain::{
    AuditLog, Branch, FieldCipher, NewAuditLog, NewBranch, NewPermissionSet, NewRole, NewUser,
    Permission, PermissionSet, Role, User,
};
use access_admin::errors::{AppError, AppResult};
use access_admin::infra::repositories::{
    AuditLogRepository, BranchRepository, PermissionRepository, PermissionSetRepository,
    RoleRepository, UserRepository,
};
use access_admin::services::{
    AccessFacade, Auditor, BranchManager, PermissionManager, PermissionSetManager, RoleManager,
    UserManager,
};

pub const ADMIN_ID: i64 = 1;
pub const CHECKER_ID: i64 = 2;
pub const TEST_KEY: [u8; 32] = [0x42; 32];

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn seed(&self, user: User) {
        self.next_id.fetch_max(user.id + 1, Ordering::SeqCst);
        self.rows.lock().unwrap().push(user);
    }

    pub fn get(&self, id: i64) -> Option<User> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.get(id))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_by_pf_no(&self, pf_no: &str) -> AppResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.pf_no.eq_ignore_ascii_case(pf_no))
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn exists_by_username_excluding(&self, username: &str, id: i64) -> AppResult<bool> {
        Ok(self
            .find_by_username(username)
            .await?
            .is_some_and(|u| u.id != id))
    }

    async fn exists_by_pf_no(&self, pf_no: &str) -> AppResult<bool> {
        Ok(self.find_by_pf_no(pf_no).await?.is_some())
    }

    async fn exists_by_pf_no_excluding(&self, pf_no: &str, id: i64) -> AppResult<bool> {
        Ok(self.find_by_pf_no(pf_no).await?.is_some_and(|u| u.id != id))
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let row = User {
            id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            gender: user.gender,
            pf_no: user.pf_no,
            email: user.email,
            password_hash: user.password_hash,
            branch_id: user.branch_id,
            role_id: user.role_id,
            active: false,
            verified: false,
            deleted: false,
            logged_in: false,
            verified_by: None,
            created_by: user.created_by,
            created_on: now,
            modified_by: None,
            modified_on: now,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AppError::not_found("User", "Id", user.id))?;
        *row = user.clone();
        Ok(row.clone())
    }
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryBranches {
    rows: Mutex<Vec<Branch>>,
    next_id: AtomicI64,
}

impl InMemoryBranches {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn get(&self, id: i64) -> Option<Branch> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl BranchRepository for InMemoryBranches {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Branch>> {
        Ok(self.get(id))
    }

    async fn find_by_sol_id(&self, sol_id: &str) -> AppResult<Option<Branch>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.sol_id == sol_id)
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Branch>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        Ok(self.get(id).is_some())
    }

    async fn exists_by_sol_id(&self, sol_id: &str) -> AppResult<bool> {
        Ok(self.find_by_sol_id(sol_id).await?.is_some())
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|b| b.name.eq_ignore_ascii_case(name)))
    }

    async fn exists_by_sol_id_excluding(&self, sol_id: &str, id: i64) -> AppResult<bool> {
        Ok(self
            .find_by_sol_id(sol_id)
            .await?
            .is_some_and(|b| b.id != id))
    }

    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|b| b.name.eq_ignore_ascii_case(name) && b.id != id))
    }

    async fn insert(&self, branch: NewBranch) -> AppResult<Branch> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = Branch {
            id,
            sol_id: branch.sol_id,
            name: branch.name,
            active: branch.active,
            deleted: false,
            created_on: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update(&self, branch: &Branch) -> AppResult<Branch> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|b| b.id == branch.id)
            .ok_or_else(|| AppError::not_found("Branch", "Id", branch.id))?;
        *row = branch.clone();
        Ok(row.clone())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        self.rows.lock().unwrap().retain(|b| b.id != id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryPermissions {
    rows: Mutex<Vec<Permission>>,
}

impl InMemoryPermissions {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }

    pub fn seed(&self, permission: Permission) {
        self.rows.lock().unwrap().push(permission);
    }

    pub fn get(&self, id: i64) -> Option<Permission> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }
}

#[async_trait]
impl PermissionRepository for InMemoryPermissions {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Permission>> {
        Ok(self.get(id))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn find_by_ids(&self, ids: Vec<i64>) -> AppResult<Vec<Permission>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> AppResult<Vec<Permission>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name) && p.id != id))
    }

    async fn update(&self, permission: &Permission) -> AppResult<Permission> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == permission.id)
            .ok_or_else(|| AppError::not_found("Permission", "Id", permission.id))?;
        *row = permission.clone();
        Ok(row.clone())
    }

    async fn set_locked(&self, permission_ids: Vec<i64>, locked: bool) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        for row in rows.iter_mut() {
            if permission_ids.contains(&row.id) {
                row.locked = locked;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Permission sets
// ---------------------------------------------------------------------------

pub struct InMemoryPermissionSets {
    rows: Mutex<Vec<PermissionSet>>,
    members: Mutex<HashSet<(i64, i64)>>,
    next_id: AtomicI64,
    permissions: Arc<InMemoryPermissions>,
}

impl InMemoryPermissionSets {
    pub fn new(permissions: Arc<InMemoryPermissions>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            members: Mutex::new(HashSet::new()),
            next_id: AtomicI64::new(1),
            permissions,
        }
    }

    pub fn get(&self, id: i64) -> Option<PermissionSet> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub fn member_ids(&self, set_id: i64) -> Vec<i64> {
        self.members
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == set_id)
            .map(|(_, p)| *p)
            .collect()
    }
}

#[async_trait]
impl PermissionSetRepository for InMemoryPermissionSets {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<PermissionSet>> {
        Ok(self.get(id))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<PermissionSet>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn find_by_ids(&self, ids: Vec<i64>) -> AppResult<Vec<PermissionSet>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> AppResult<Vec<PermissionSet>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        Ok(self.get(id).is_some())
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        Ok(self.find_by_name(name).await?.is_some())
    }

    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool> {
        Ok(self.find_by_name(name).await?.is_some_and(|s| s.id != id))
    }

    async fn insert(&self, set: NewPermissionSet) -> AppResult<PermissionSet> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = PermissionSet {
            id,
            name: set.name,
            description: set.description,
            locked: set.locked,
            deleted: false,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update(&self, set: &PermissionSet) -> AppResult<PermissionSet> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|s| s.id == set.id)
            .ok_or_else(|| AppError::not_found("PermissionSet", "Id", set.id))?;
        *row = set.clone();
        Ok(row.clone())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        self.rows.lock().unwrap().retain(|s| s.id != id);
        self.members.lock().unwrap().retain(|(s, _)| *s != id);
        Ok(())
    }

    async fn permissions_of(&self, set_id: i64) -> AppResult<Vec<Permission>> {
        let ids = self.member_ids(set_id);
        self.permissions.find_by_ids(ids).await
    }

    async fn add_permissions(&self, set_id: i64, permission_ids: Vec<i64>) -> AppResult<()> {
        let mut members = self.members.lock().unwrap();
        for pid in permission_ids {
            members.insert((set_id, pid));
        }
        Ok(())
    }

    async fn remove_permissions(&self, set_id: i64, permission_ids: Vec<i64>) -> AppResult<()> {
        self.members
            .lock()
            .unwrap()
            .retain(|(s, p)| *s != set_id || !permission_ids.contains(p));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

pub struct InMemoryRoles {
    rows: Mutex<Vec<Role>>,
    grants: Mutex<HashSet<(i64, i64)>>,
    next_id: AtomicI64,
    sets: Arc<InMemoryPermissionSets>,
}

impl InMemoryRoles {
    pub fn new(sets: Arc<InMemoryPermissionSets>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            grants: Mutex::new(HashSet::new()),
            next_id: AtomicI64::new(1),
            sets,
        }
    }

    pub fn get(&self, id: i64) -> Option<Role> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub fn granted_set_ids(&self, role_id: i64) -> Vec<i64> {
        self.grants
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| *r == role_id)
            .map(|(_, s)| *s)
            .collect()
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoles {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>> {
        Ok(self.get(id))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Role>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        Ok(self.get(id).is_some())
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        Ok(self.find_by_name(name).await?.is_some())
    }

    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool> {
        Ok(self.find_by_name(name).await?.is_some_and(|r| r.id != id))
    }

    async fn insert(&self, role: NewRole) -> AppResult<Role> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = Role {
            id,
            name: role.name,
            description: role.description,
            deleted: false,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update(&self, role: &Role) -> AppResult<Role> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == role.id)
            .ok_or_else(|| AppError::not_found("Role", "Id", role.id))?;
        *row = role.clone();
        Ok(row.clone())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        self.rows.lock().unwrap().retain(|r| r.id != id);
        self.grants.lock().unwrap().retain(|(r, _)| *r != id);
        Ok(())
    }

    async fn permission_sets_of(&self, role_id: i64) -> AppResult<Vec<PermissionSet>> {
        let ids = self.granted_set_ids(role_id);
        self.sets.find_by_ids(ids).await
    }

    async fn add_permission_sets(&self, role_id: i64, set_ids: Vec<i64>) -> AppResult<()> {
        let mut grants = self.grants.lock().unwrap();
        for sid in set_ids {
            grants.insert((role_id, sid));
        }
        Ok(())
    }

    async fn remove_permission_sets(&self, role_id: i64, set_ids: Vec<i64>) -> AppResult<()> {
        self.grants
            .lock()
            .unwrap()
            .retain(|(r, s)| *r != role_id || !set_ids.contains(s));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Audit logs
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryAuditLogs {
    rows: Mutex<Vec<AuditLog>>,
    next_id: AtomicI64,
}

impl InMemoryAuditLogs {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn entries(&self) -> Vec<AuditLog> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogs {
    async fn insert(&self, entry: NewAuditLog) -> AppResult<AuditLog> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = AuditLog {
            id,
            action: entry.action,
            ip_address: entry.ip_address,
            logged_at: entry.logged_at,
            user_id: entry.user_id,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn find_all(&self) -> AppResult<Vec<AuditLog>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.logged_at.cmp(&a.logged_at));
        Ok(rows)
    }

    async fn find_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<AuditLog>> {
        let mut rows: Vec<AuditLog> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.logged_at >= start && l.logged_at <= end)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.logged_at.cmp(&a.logged_at));
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// Fully wired facade over in-memory stores, pre-seeded with two live
/// administrators: `admin` (id 1) and `checker` (id 2).
pub struct Harness {
    pub facade: AccessFacade,
    pub users: Arc<InMemoryUsers>,
    pub branches: Arc<InMemoryBranches>,
    pub roles: Arc<InMemoryRoles>,
    pub sets: Arc<InMemoryPermissionSets>,
    pub permissions: Arc<InMemoryPermissions>,
    pub logs: Arc<InMemoryAuditLogs>,
}

impl Harness {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUsers::new());
        let branches = Arc::new(InMemoryBranches::new());
        let permissions = Arc::new(InMemoryPermissions::new());
        let sets = Arc::new(InMemoryPermissionSets::new(permissions.clone()));
        let roles = Arc::new(InMemoryRoles::new(sets.clone()));
        let logs = Arc::new(InMemoryAuditLogs::new());

        users.seed(live_user(ADMIN_ID, "admin", "system"));
        users.seed(live_user(CHECKER_ID, "checker", "system"));

        let auditor = Arc::new(Auditor::new(users.clone(), logs.clone()));
        let branch_service = Arc::new(BranchManager::new(branches.clone(), auditor.clone()));
        let user_service = Arc::new(UserManager::new(users.clone(), auditor.clone()));
        let role_service = Arc::new(RoleManager::new(
            roles.clone(),
            sets.clone(),
            auditor.clone(),
        ));
        let set_service = Arc::new(PermissionSetManager::new(
            sets.clone(),
            permissions.clone(),
            auditor.clone(),
        ));
        let permission_service = Arc::new(PermissionManager::new(
            permissions.clone(),
            auditor.clone(),
        ));

        let facade = AccessFacade::new(
            branch_service,
            user_service,
            role_service,
            set_service,
            permission_service,
            auditor,
            FieldCipher::new(&TEST_KEY),
        );

        Self {
            facade,
            users,
            branches,
            roles,
            sets,
            permissions,
            logs,
        }
    }
}

/// An already active, verified user row for seeding actors.
pub fn live_user(id: i64, username: &str, created_by: &str) -> User {
    let now = Utc::now();
    User {
        id,
        username: username.to_string(),
        first_name: "enc".to_string(),
        last_name: "enc".to_string(),
        gender: "F".to_string(),
        pf_no: format!("PF{:03}", id),
        email: "enc".to_string(),
        password_hash: "hash".to_string(),
        branch_id: 0,
        role_id: 0,
        active: true,
        verified: true,
        deleted: false,
        logged_in: false,
        verified_by: Some("system".to_string()),
        created_by: created_by.to_string(),
        created_on: now,
        modified_by: None,
        modified_on: now,
    }
}

pub fn seeded_permission(id: i64, name: &str) -> Permission {
    Permission {
        id,
        name: name.to_string(),
        description: None,
        locked: false,
    }
}
