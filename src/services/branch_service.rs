//! Branch service - branch lifecycle with audit-coupled mutations.
//!
//! Duplicate checks are exposed for the facade, which owns the precedence
//! rules (solId before name).

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Branch, NewBranch, UpdateBranch};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::BranchRepository;

use super::audit_service::AuditService;

#[async_trait]
pub trait BranchService: Send + Sync {
    /// Internal lookup, not audited.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Branch>>;

    async fn get_by_sol_id(&self, actor_id: i64, origin_ip: &str, sol_id: &str)
        -> AppResult<Branch>;
    async fn list_all(&self, actor_id: i64, origin_ip: &str) -> AppResult<Vec<Branch>>;
    async fn create(&self, actor_id: i64, origin_ip: &str, branch: NewBranch) -> AppResult<Branch>;
    async fn activate(
        &self,
        actor_id: i64,
        origin_ip: &str,
        id: i64,
        status: bool,
    ) -> AppResult<Branch>;
    async fn update(
        &self,
        actor_id: i64,
        origin_ip: &str,
        branch: UpdateBranch,
    ) -> AppResult<Branch>;
    async fn soft_delete(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<()>;
    async fn purge(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<()>;

    async fn exists_by_id(&self, id: i64) -> AppResult<bool>;
    async fn exists_by_sol_id(&self, sol_id: &str) -> AppResult<bool>;
    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;
    async fn exists_by_sol_id_excluding(&self, sol_id: &str, id: i64) -> AppResult<bool>;
    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool>;
}

pub struct BranchManager {
    branches: Arc<dyn BranchRepository>,
    auditor: Arc<dyn AuditService>,
}

impl BranchManager {
    pub fn new(branches: Arc<dyn BranchRepository>, auditor: Arc<dyn AuditService>) -> Self {
        Self { branches, auditor }
    }

    async fn require_branch(&self, id: i64) -> AppResult<Branch> {
        self.branches
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Branch", "Id", id))
    }
}

#[async_trait]
impl BranchService for BranchManager {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Branch>> {
        self.branches.find_by_id(id).await
    }

    async fn get_by_sol_id(
        &self,
        actor_id: i64,
        origin_ip: &str,
        sol_id: &str,
    ) -> AppResult<Branch> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let branch = self
            .branches
            .find_by_sol_id(sol_id)
            .await?
            .ok_or_else(|| AppError::not_found("Branch", "SolId", sol_id))?;
        self.auditor
            .record(
                &actor,
                format!("Retrieved branch with SolId '{}'", sol_id),
                origin_ip,
            )
            .await?;
        Ok(branch)
    }

    async fn list_all(&self, actor_id: i64, origin_ip: &str) -> AppResult<Vec<Branch>> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let branches = self.branches.find_all().await?;
        self.auditor
            .record(&actor, "Retrieved all branches".to_string(), origin_ip)
            .await?;
        Ok(branches)
    }

    async fn create(&self, actor_id: i64, origin_ip: &str, branch: NewBranch) -> AppResult<Branch> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let created = self.branches.insert(branch).await?;
        self.auditor
            .record(
                &actor,
                format!(
                    "Created branch '{}' with SolId '{}'",
                    created.name, created.sol_id
                ),
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
    ) -> AppResult<Branch> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let mut branch = self.require_branch(id).await?;
        if branch.deleted {
            return Err(AppError::not_active("Branch", "Id", id));
        }
        branch.active = status;
        let updated = self.branches.update(&branch).await?;
        let verb = if status { "Activated" } else { "Deactivated" };
        self.auditor
            .record(
                &actor,
                format!("{} branch with SolId '{}'", verb, updated.sol_id),
                origin_ip,
            )
            .await?;
        Ok(updated)
    }

    async fn update(
        &self,
        actor_id: i64,
        origin_ip: &str,
        changes: UpdateBranch,
    ) -> AppResult<Branch> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let mut branch = self.require_branch(changes.id).await?;
        if branch.deleted {
            return Err(AppError::not_active("Branch", "Id", changes.id));
        }
        branch.sol_id = changes.sol_id;
        branch.name = changes.name;
        branch.active = changes.active;
        let updated = self.branches.update(&branch).await?;
        self.auditor
            .record(
                &actor,
                format!("Updated branch with SolId '{}'", updated.sol_id),
                origin_ip,
            )
            .await?;
        Ok(updated)
    }

    async fn soft_delete(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<()> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let mut branch = self.require_branch(id).await?;
        branch.deleted = true;
        let deleted = self.branches.update(&branch).await?;
        self.auditor
            .record(
                &actor,
                format!("Deleted branch with SolId '{}'", deleted.sol_id),
                origin_ip,
            )
            .await?;
        Ok(())
    }

    async fn purge(&self, actor_id: i64, origin_ip: &str, id: i64) -> AppResult<()> {
        let actor = self.auditor.require_actor(actor_id).await?;
        let branch = self.require_branch(id).await?;
        self.branches.delete_by_id(id).await?;
        self.auditor
            .record(
                &actor,
                format!("Purged branch with SolId '{}'", branch.sol_id),
                origin_ip,
            )
            .await?;
        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        self.branches.exists_by_id(id).await
    }

    async fn exists_by_sol_id(&self, sol_id: &str) -> AppResult<bool> {
        self.branches.exists_by_sol_id(sol_id).await
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        self.branches.exists_by_name(name).await
    }

    async fn exists_by_sol_id_excluding(&self, sol_id: &str, id: i64) -> AppResult<bool> {
        self.branches.exists_by_sol_id_excluding(sol_id, id).await
    }

    async fn exists_by_name_excluding(&self, name: &str, id: i64) -> AppResult<bool> {
        self.branches.exists_by_name_excluding(name, id).await
    }
}
