//! User service - user lifecycle state machine with audit-coupled mutations.
//!
//! New users start inactive, unverified, not deleted. Verification is
//! maker-checker: the creator of a record can never verify it, compared
//! case-insensitively like every other username lookup. Soft delete is
//! terminal.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::domain::{NewUser, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::UserRepository;

use super::audit_service::AuditService;

#[async_trait]
pub trait UserService: Send + Sync {
    /// Internal lookup, not audited.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    async fn get_by_id(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<User>;
    async fn get_by_username(
        &self,
        actor_id: i64,
        origin_ip: &str,
        username: &str,
    ) -> AppResult<User>;
    async fn get_by_pf_no(&self, actor_id: i64, origin_ip: &str, pf_no: &str) -> AppResult<User>;
    async fn list_all(&self, actor_id: i64, origin_ip: &str) -> AppResult<Vec<User>>;

    /// Insert a prepared user row; the caller has already hashed the
    /// password and encrypted the PII fields. `created_by` is stamped from
    /// the resolved actor, whatever the payload carries.
    async fn create(&self, actor_id: i64, origin_ip: &str, user: NewUser) -> AppResult<User>;

    async fn activate(
        &self,
        actor_id: i64,
        origin_ip: &str,
        id: i64,
        status: bool,
    ) -> AppResult<User>;

    /// Mark a user verified and active. The actor must not be the record's creator.
    async fn verify(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<User>;

    /// Terminal: clears active and verified, sets deleted.
    async fn soft_delete(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<()>;

    /// Verify the old password, then store a hash of the new one.
    async fn update_password(
        &self,
        actor_id: i64,
        origin_ip: &str,
        id: i64,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<User>;

    /// Persist an already-merged user record (PII pre-encrypted).
    async fn update_record(&self, actor_id: i64, origin_ip: &str, user: User) -> AppResult<User>;

    async fn set_login_status(
        &self,
        actor_id: i64,
        origin_ip: &str,
        id: i64,
        logged_in: bool,
    ) -> AppResult<User>;

    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;
    async fn exists_by_username_excluding(&self, username: &str, id: i64) -> AppResult<bool>;
    async fn exists_by_pf_no(&self, pf_no: &str) -> AppResult<bool>;
    async fn exists_by_pf_no_excluding(&self, pf_no: &str, id: i64) -> AppResult<bool>;
}

pub struct UserManager {
    users: Arc<dyn UserRepository>,
    auditor: Arc<dyn AuditService>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>, auditor: Arc<dyn AuditService>) -> Self {
        Self { users, auditor }
    }

    async fn require_user(&self, id: i64) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User", "Id", id))
    }

    async fn require_live_user(&self, id: i64) -> AppResult<User> {
        let user = self.require_user(id).await?;
        if user.deleted {
            return Err(AppError::not_active("User", "Id", id));
        }
        Ok(user)
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn get_by_id(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<User> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let user = self.require_user(id).await?;
        self.auditor
            .record(
                &actor,
                format!("Retrieved user '{}'", user.username),
                origin_ip,
            )
            .await?;
        Ok(user)
    }

    async fn get_by_username(
        &self,
        actor_id: i64,
        origin_ip: &str,
        username: &str,
    ) -> AppResult<User> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("User", "Username", username))?;
        self.auditor
            .record(
                &actor,
                format!("Retrieved user with username '{}'", username),
                origin_ip,
            )
            .await?;
        Ok(user)
    }

    async fn get_by_pf_no(&self, actor_id: i64, origin_ip: &str, pf_no: &str) -> AppResult<User> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let user = self
            .users
            .find_by_pf_no(pf_no)
            .await?
            .ok_or_else(|| AppError::not_found("User", "PfNo", pf_no))?;
        self.auditor
            .record(
                &actor,
                format!("Retrieved user with PF number '{}'", pf_no),
                origin_ip,
            )
            .await?;
        Ok(user)
    }

    async fn list_all(&self, actor_id: i64, origin_ip: &str) -> AppResult<Vec<User>> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let users = self.users.find_all().await?;
        self.auditor
            .record(&actor, "Retrieved all users".to_string(), origin_ip)
            .await?;
        Ok(users)
    }

    async fn create(&self, actor_id: i64, origin_ip: &str, user: NewUser) -> AppResult<User> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let mut user = user;
        user.created_by = actor.username.clone();
        let created = self.users.insert(user).await?;
        self.auditor
            .record(
                &actor,
                format!("Created user '{}'", created.username),
                origin_ip,
            )
            .await?;
        Ok(created)
    }

    async fn activate(
        &self,
        actor_id: i64,
        origin_ip: &str,
        id: i64,
        status: bool,
    ) -> AppResult<User> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let mut user = self.require_live_user(id).await?;
        user.active = status;
        user.modified_by = Some(actor.username.clone());
        user.modified_on = Utc::now();
        let updated = self.users.update(&user).await?;
        let verb = if status { "Activated" } else { "Deactivated" };
        self.auditor
            .record(
                &actor,
                format!("{} user '{}'", verb, updated.username),
                origin_ip,
            )
            .await?;
        Ok(updated)
    }

    async fn verify(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<User> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let mut user = self.require_live_user(id).await?;
        if user.created_by_matches(&actor.username) {
            return Err(AppError::client(format!(
                "User '{}' cannot verify a record they created",
                actor.username
            )));
        }
        user.active = true;
        user.verified = true;
        user.verified_by = Some(actor.username.clone());
        user.modified_by = Some(actor.username.clone());
        user.modified_on = Utc::now();
        let updated = self.users.update(&user).await?;
        self.auditor
            .record(
                &actor,
                format!("Verified user '{}'", updated.username),
                origin_ip,
            )
            .await?;
        Ok(updated)
    }

    async fn soft_delete(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<()> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let mut user = self.require_user(id).await?;
        user.active = false;
        user.verified = false;
        user.deleted = true;
        user.modified_by = Some(actor.username.clone());
        user.modified_on = Utc::now();
        let deleted = self.users.update(&user).await?;
        self.auditor
            .record(
                &actor,
                format!("Deleted user '{}'", deleted.username),
                origin_ip,
            )
            .await?;
        Ok(())
    }

    async fn update_password(
        &self,
        actor_id: i64,
        origin_ip: &str,
        id: i64,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<User> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let mut user = self.require_live_user(id).await?;
        if !Password::from_hash(user.password_hash.clone()).verify(old_password) {
            return Err(AppError::client("Old password does not match"));
        }
        user.password_hash = Password::new(new_password)?.into_string();
        user.modified_by = Some(actor.username.clone());
        user.modified_on = Utc::now();
        let updated = self.users.update(&user).await?;
        self.auditor
            .record(
                &actor,
                format!("Changed password for user '{}'", updated.username),
                origin_ip,
            )
            .await?;
        Ok(updated)
    }

    async fn update_record(&self, actor_id: i64, origin_ip: &str, user: User) -> AppResult<User> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let existing = self.require_live_user(user.id).await?;
        let mut merged = user;
        merged.created_by = existing.created_by;
        merged.created_on = existing.created_on;
        merged.modified_by = Some(actor.username.clone());
        merged.modified_on = Utc::now();
        let updated = self.users.update(&merged).await?;
        self.auditor
            .record(
                &actor,
                format!("Updated user '{}'", updated.username),
                origin_ip,
            )
            .await?;
        Ok(updated)
    }

    async fn set_login_status(
        &self,
        actor_id: i64,
        origin_ip: &str,
        id: i64,
        logged_in: bool,
    ) -> AppResult<User> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let mut user = self.require_live_user(id).await?;
        user.logged_in = logged_in;
        user.modified_by = Some(actor.username.clone());
        user.modified_on = Utc::now();
        let updated = self.users.update(&user).await?;
        let verb = if logged_in { "logged in" } else { "logged out" };
        self.auditor
            .record(
                &actor,
                format!("User '{}' {}", updated.username, verb),
                origin_ip,
            )
            .await?;
        Ok(updated)
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        self.users.exists_by_username(username).await
    }

    async fn exists_by_username_excluding(&self, username: &str, id: i64) -> AppResult<bool> {
        self.users.exists_by_username_excluding(username, id).await
    }

    async fn exists_by_pf_no(&self, pf_no: &str) -> AppResult<bool> {
        self.users.exists_by_pf_no(pf_no).await
    }

    async fn exists_by_pf_no_excluding(&self, pf_no: &str, id: i64) -> AppResult<bool> {
        self.users.exists_by_pf_no_excluding(pf_no, id).await
    }
}
