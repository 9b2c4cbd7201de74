//! Service container - wires repositories, services and the facade.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::FieldCipher;
use crate::infra::repositories::{
    AuditLogStore, BranchStore, PermissionSetStore, PermissionStore, RoleStore, UserStore,
};

use super::audit_service::Auditor;
use super::branch_service::BranchManager;
use super::facade::AccessFacade;
use super::permission_service::PermissionManager;
use super::permission_set_service::PermissionSetManager;
use super::role_service::RoleManager;
use super::user_service::UserManager;

/// Build the fully wired facade from a database connection and config.
pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Arc<AccessFacade> {
    let users = Arc::new(UserStore::new(db.clone()));
    let branches = Arc::new(BranchStore::new(db.clone()));
    let roles = Arc::new(RoleStore::new(db.clone()));
    let sets = Arc::new(PermissionSetStore::new(db.clone()));
    let permissions = Arc::new(PermissionStore::new(db.clone()));
    let logs = Arc::new(AuditLogStore::new(db));

    let auditor = Arc::new(Auditor::new(users.clone(), logs));

    let branch_service = Arc::new(BranchManager::new(branches, auditor.clone()));
    let user_service = Arc::new(UserManager::new(users, auditor.clone()));
    let role_service = Arc::new(RoleManager::new(roles, sets.clone(), auditor.clone()));
    let set_service = Arc::new(PermissionSetManager::new(
        sets,
        permissions.clone(),
        auditor.clone(),
    ));
    let permission_service = Arc::new(PermissionManager::new(permissions, auditor.clone()));

    Arc::new(AccessFacade::new(
        branch_service,
        user_service,
        role_service,
        set_service,
        permission_service,
        auditor,
        FieldCipher::new(config.field_key()),
    ))
}
