//! Access facade - the single entry point the API layer calls.
//!
//! The facade owns cross-entity validation order and the crypto boundary:
//! referential checks run in a fixed sequence (branch exists, branch active,
//! role exists, username duplicate, PF-number duplicate), duplicate checks
//! for branches probe solId before name, PII fields are encrypted on the
//! way in and decrypted on the way out, and passwords are hashed before any
//! service sees them. Handlers never touch the services directly.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::{
    AuditLog, Branch, ChangePassword, CreateBranch, CreatePermissionSet, CreateRole, CreateUser,
    FieldCipher, NewBranch, NewRole, NewUser, Password, Permission, PermissionSet,
    PermissionSetView, Role, UpdateBranch, UpdatePermission, UpdatePermissionSet, UpdateRole,
    UpdateUser, User, UserResponse,
};
use crate::errors::{AppError, AppResult};

use super::audit_service::AuditService;
use super::branch_service::BranchService;
use super::permission_service::PermissionService;
use super::permission_set_service::PermissionSetService;
use super::role_service::RoleService;
use super::user_service::UserService;

pub struct AccessFacade {
    branches: Arc<dyn BranchService>,
    users: Arc<dyn UserService>,
    roles: Arc<dyn RoleService>,
    sets: Arc<dyn PermissionSetService>,
    permissions: Arc<dyn PermissionService>,
    auditor: Arc<dyn AuditService>,
    cipher: FieldCipher,
}

impl AccessFacade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        branches: Arc<dyn BranchService>,
        users: Arc<dyn UserService>,
        roles: Arc<dyn RoleService>,
        sets: Arc<dyn PermissionSetService>,
        permissions: Arc<dyn PermissionService>,
        auditor: Arc<dyn AuditService>,
        cipher: FieldCipher,
    ) -> Self {
        Self {
            branches,
            users,
            roles,
            sets,
            permissions,
            auditor,
            cipher,
        }
    }

    fn decrypt_user(&self, user: User) -> AppResult<UserResponse> {
        let mut response = UserResponse::from(user);
        response.first_name = self.cipher.decrypt(&response.first_name, "FirstName")?;
        response.last_name = self.cipher.decrypt(&response.last_name, "LastName")?;
        response.email = self.cipher.decrypt(&response.email, "User Email")?;
        Ok(response)
    }

    /// Referential checks shared by user create and update, in the order
    /// the API reports them: branch exists, branch active, role exists.
    async fn check_user_bindings(&self, branch_id: i64, role_id: i64) -> AppResult<Branch> {
        let branch = self
            .branches
            .find_by_id(branch_id)
            .await?
            .ok_or_else(|| AppError::not_found("Branch", "Id", branch_id))?;
        if branch.deleted || !branch.active {
            return Err(AppError::not_active("Branch", "Id", branch_id));
        }
        let role = self
            .roles
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| AppError::not_found("Role", "Id", role_id))?;
        if role.deleted {
            return Err(AppError::not_active("Role", "Id", role_id));
        }
        Ok(branch)
    }

    // ---- branches ----

    pub async fn create_branch(
        &self,
        payload: CreateBranch,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<Branch> {
        // solId before name, so a record conflicting on both reports solId
        if self.branches.exists_by_sol_id(&payload.sol_id).await? {
            return Err(AppError::conflict("Branch", "SolId", &payload.sol_id));
        }
        if self.branches.exists_by_name(&payload.name).await? {
            return Err(AppError::conflict("Branch", "Name", &payload.name));
        }
        self.branches
            .create(
                actor_id,
                origin_ip,
                NewBranch {
                    sol_id: payload.sol_id,
                    name: payload.name,
                    active: payload.active,
                },
            )
            .await
    }

    pub async fn update_branch(
        &self,
        payload: UpdateBranch,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<Branch> {
        if !self.branches.exists_by_id(payload.id).await? {
            return Err(AppError::not_found("Branch", "Id", payload.id));
        }
        if self
            .branches
            .exists_by_sol_id_excluding(&payload.sol_id, payload.id)
            .await?
        {
            return Err(AppError::conflict("Branch", "SolId", &payload.sol_id));
        }
        if self
            .branches
            .exists_by_name_excluding(&payload.name, payload.id)
            .await?
        {
            return Err(AppError::conflict("Branch", "Name", &payload.name));
        }
        self.branches.update(actor_id, origin_ip, payload).await
    }

    pub async fn get_branch(
        &self,
        sol_id: &str,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<Branch> {
        self.branches.get_by_sol_id(actor_id, origin_ip, sol_id).await
    }

    pub async fn list_branches(&self, actor_id: i64, origin_ip: &str) -> AppResult<Vec<Branch>> {
        self.branches.list_all(actor_id, origin_ip).await
    }

    pub async fn activate_branch(
        &self,
        id: i64,
        status: bool,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<Branch> {
        self.branches.activate(actor_id, origin_ip, id, status).await
    }

    pub async fn delete_branch(&self, id: i64, actor_id: i64, origin_ip: &str) -> AppResult<()> {
        self.branches.soft_delete(actor_id, origin_ip, id).await
    }

    pub async fn purge_branch(&self, id: i64, actor_id: i64, origin_ip: &str) -> AppResult<()> {
        self.branches.purge(actor_id, origin_ip, id).await
    }

    // ---- users ----

    pub async fn create_user(
        &self,
        payload: CreateUser,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<UserResponse> {
        self.check_user_bindings(payload.branch_id, payload.role_id)
            .await?;
        if self.users.exists_by_username(&payload.username).await? {
            return Err(AppError::conflict("User", "Username", &payload.username));
        }
        if self.users.exists_by_pf_no(&payload.pf_no).await? {
            return Err(AppError::conflict("User", "PfNo", &payload.pf_no));
        }

        let password_hash = Password::new(&payload.password)?.into_string();
        let user = NewUser {
            username: payload.username,
            first_name: self.cipher.encrypt(&payload.first_name, "FirstName")?,
            last_name: self.cipher.encrypt(&payload.last_name, "LastName")?,
            gender: payload.gender,
            pf_no: payload.pf_no,
            email: self.cipher.encrypt(&payload.email, "User Email")?,
            password_hash,
            branch_id: payload.branch_id,
            role_id: payload.role_id,
            created_by: String::new(), // stamped by the service from the actor
        };
        let created = self.users.create(actor_id, origin_ip, user).await?;
        self.decrypt_user(created)
    }

    pub async fn update_user(
        &self,
        payload: UpdateUser,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<UserResponse> {
        let existing = self
            .users
            .find_by_id(payload.id)
            .await?
            .ok_or_else(|| AppError::not_found("User", "Id", payload.id))?;
        if existing.deleted {
            return Err(AppError::not_active("User", "Id", payload.id));
        }
        self.check_user_bindings(payload.branch_id, payload.role_id)
            .await?;
        if self
            .users
            .exists_by_username_excluding(&payload.username, payload.id)
            .await?
        {
            return Err(AppError::conflict("User", "Username", &payload.username));
        }
        if self
            .users
            .exists_by_pf_no_excluding(&payload.pf_no, payload.id)
            .await?
        {
            return Err(AppError::conflict("User", "PfNo", &payload.pf_no));
        }

        let mut merged = existing;
        merged.username = payload.username;
        merged.first_name = self.cipher.encrypt(&payload.first_name, "FirstName")?;
        merged.last_name = self.cipher.encrypt(&payload.last_name, "LastName")?;
        merged.gender = payload.gender;
        merged.pf_no = payload.pf_no;
        merged.email = self.cipher.encrypt(&payload.email, "User Email")?;
        merged.branch_id = payload.branch_id;
        merged.role_id = payload.role_id;
        let updated = self.users.update_record(actor_id, origin_ip, merged).await?;
        self.decrypt_user(updated)
    }

    pub async fn get_user(
        &self,
        id: i64,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<UserResponse> {
        let user = self.users.get_by_id(actor_id, origin_ip, id).await?;
        self.decrypt_user(user)
    }

    pub async fn get_user_by_username(
        &self,
        username: &str,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<UserResponse> {
        let user = self
            .users
            .get_by_username(actor_id, origin_ip, username)
            .await?;
        self.decrypt_user(user)
    }

    pub async fn get_user_by_pf_no(
        &self,
        pf_no: &str,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<UserResponse> {
        let user = self.users.get_by_pf_no(actor_id, origin_ip, pf_no).await?;
        self.decrypt_user(user)
    }

    pub async fn list_users(
        &self,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<Vec<UserResponse>> {
        let users = self.users.list_all(actor_id, origin_ip).await?;
        let mut responses = Vec::with_capacity(users.len());
        for user in users {
            responses.push(self.decrypt_user(user)?);
        }
        Ok(responses)
    }

    pub async fn activate_user(
        &self,
        id: i64,
        status: bool,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<UserResponse> {
        let user = self.users.activate(actor_id, origin_ip, id, status).await?;
        self.decrypt_user(user)
    }

    pub async fn verify_user(
        &self,
        id: i64,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<UserResponse> {
        let user = self.users.verify(actor_id, origin_ip, id).await?;
        self.decrypt_user(user)
    }

    pub async fn delete_user(&self, id: i64, actor_id: i64, origin_ip: &str) -> AppResult<()> {
        self.users.soft_delete(actor_id, origin_ip, id).await
    }

    pub async fn change_password(
        &self,
        payload: ChangePassword,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<UserResponse> {
        let user = self
            .users
            .update_password(
                actor_id,
                origin_ip,
                payload.id,
                &payload.old_password,
                &payload.new_password,
            )
            .await?;
        self.decrypt_user(user)
    }

    pub async fn set_login_status(
        &self,
        id: i64,
        logged_in: bool,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<UserResponse> {
        let user = self
            .users
            .set_login_status(actor_id, origin_ip, id, logged_in)
            .await?;
        self.decrypt_user(user)
    }

    // ---- roles ----

    pub async fn create_role(
        &self,
        payload: CreateRole,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<Role> {
        if self.roles.exists_by_name(&payload.name).await? {
            return Err(AppError::conflict("Role", "Name", &payload.name));
        }
        self.roles
            .create(
                actor_id,
                origin_ip,
                NewRole {
                    name: payload.name,
                    description: payload.description,
                },
            )
            .await
    }

    pub async fn update_role(
        &self,
        payload: UpdateRole,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<Role> {
        if !self.roles.exists_by_id(payload.id).await? {
            return Err(AppError::not_found("Role", "Id", payload.id));
        }
        if self
            .roles
            .exists_by_name_excluding(&payload.name, payload.id)
            .await?
        {
            return Err(AppError::conflict("Role", "Name", &payload.name));
        }
        self.roles.update(actor_id, origin_ip, payload).await
    }

    pub async fn get_role(&self, id: i64, actor_id: i64, origin_ip: &str) -> AppResult<Role> {
        self.roles.get_by_id(actor_id, origin_ip, id).await
    }

    pub async fn get_role_by_name(
        &self,
        name: &str,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<Role> {
        self.roles.get_by_name(actor_id, origin_ip, name).await
    }

    pub async fn list_roles(&self, actor_id: i64, origin_ip: &str) -> AppResult<Vec<Role>> {
        self.roles.list_all(actor_id, origin_ip).await
    }

    pub async fn grant_permission_sets(
        &self,
        role_id: i64,
        set_ids: Vec<i64>,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<Vec<PermissionSet>> {
        self.roles
            .grant_permission_sets(actor_id, origin_ip, role_id, set_ids)
            .await
    }

    pub async fn deny_permission_sets(
        &self,
        role_id: i64,
        set_ids: Vec<i64>,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<()> {
        self.roles
            .deny_permission_sets(actor_id, origin_ip, role_id, set_ids)
            .await
    }

    pub async fn role_permission_sets(
        &self,
        role_id: i64,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<Vec<PermissionSet>> {
        self.roles
            .permission_sets_of(actor_id, origin_ip, role_id)
            .await
    }

    pub async fn delete_role(&self, id: i64, actor_id: i64, origin_ip: &str) -> AppResult<()> {
        self.roles.soft_delete(actor_id, origin_ip, id).await
    }

    pub async fn purge_role(&self, id: i64, actor_id: i64, origin_ip: &str) -> AppResult<()> {
        self.roles.purge(actor_id, origin_ip, id).await
    }

    // ---- permission sets ----

    pub async fn create_permission_set(
        &self,
        payload: CreatePermissionSet,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<PermissionSetView> {
        if self.sets.exists_by_name(&payload.name).await? {
            return Err(AppError::conflict("PermissionSet", "Name", &payload.name));
        }
        self.sets.create(actor_id, origin_ip, payload).await
    }

    pub async fn update_permission_set(
        &self,
        payload: UpdatePermissionSet,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<PermissionSet> {
        if !self.sets.exists_by_id(payload.id).await? {
            return Err(AppError::not_found("PermissionSet", "Id", payload.id));
        }
        if self
            .sets
            .exists_by_name_excluding(&payload.name, payload.id)
            .await?
        {
            return Err(AppError::conflict("PermissionSet", "Name", &payload.name));
        }
        self.sets.update(actor_id, origin_ip, payload).await
    }

    pub async fn get_permission_set(
        &self,
        id: i64,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<PermissionSetView> {
        self.sets.get_by_id(actor_id, origin_ip, id).await
    }

    pub async fn get_permission_set_by_name(
        &self,
        name: &str,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<PermissionSetView> {
        self.sets.get_by_name(actor_id, origin_ip, name).await
    }

    pub async fn list_permission_sets(
        &self,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<Vec<PermissionSet>> {
        self.sets.list_all(actor_id, origin_ip).await
    }

    pub async fn add_permissions_to_set(
        &self,
        set_id: i64,
        permission_ids: Vec<i64>,
        lock: bool,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<PermissionSetView> {
        self.sets
            .add_permissions(actor_id, origin_ip, set_id, permission_ids, lock)
            .await
    }

    pub async fn remove_permissions_from_set(
        &self,
        set_id: i64,
        permission_ids: Vec<i64>,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<PermissionSetView> {
        self.sets
            .remove_permissions(actor_id, origin_ip, set_id, permission_ids)
            .await
    }

    pub async fn lock_permission_set(
        &self,
        set_id: i64,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<PermissionSetView> {
        self.sets.lock(actor_id, origin_ip, set_id).await
    }

    pub async fn delete_permission_set(
        &self,
        id: i64,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<()> {
        self.sets.soft_delete(actor_id, origin_ip, id).await
    }

    pub async fn purge_permission_set(
        &self,
        id: i64,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<()> {
        self.sets.purge(actor_id, origin_ip, id).await
    }

    // ---- permissions ----

    pub async fn get_permission(
        &self,
        id: i64,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<Permission> {
        self.permissions.get_by_id(actor_id, origin_ip, id).await
    }

    pub async fn get_permission_by_name(
        &self,
        name: &str,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<Permission> {
        self.permissions.get_by_name(actor_id, origin_ip, name).await
    }

    pub async fn list_permissions(
        &self,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<Vec<Permission>> {
        self.permissions.list_all(actor_id, origin_ip).await
    }

    pub async fn update_permission(
        &self,
        payload: UpdatePermission,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<Permission> {
        if self
            .permissions
            .exists_by_name_excluding(&payload.name, payload.id)
            .await?
        {
            return Err(AppError::conflict("Permission", "Name", &payload.name));
        }
        self.permissions.update(actor_id, origin_ip, payload).await
    }

    // ---- audit trail ----

    pub async fn list_logs(&self, actor_id: i64, origin_ip: &str) -> AppResult<Vec<AuditLog>> {
        self.auditor.list(actor_id, origin_ip).await
    }

    pub async fn list_logs_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        actor_id: i64,
        origin_ip: &str,
    ) -> AppResult<Vec<AuditLog>> {
        self.auditor
            .list_between(actor_id, origin_ip, start, end)
            .await
    }
}
