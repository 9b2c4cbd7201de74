//! Permission sets: independently lockable bundles of permissions.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Permission;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionSet {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub locked: bool,
    pub deleted: bool,
}

/// A permission set together with its current membership.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionSetView {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub locked: bool,
    pub deleted: bool,
    pub permissions: Vec<Permission>,
}

impl PermissionSetView {
    pub fn new(set: PermissionSet, permissions: Vec<Permission>) -> Self {
        Self {
            id: set.id,
            name: set.name,
            description: set.description,
            locked: set.locked,
            deleted: set.deleted,
            permissions,
        }
    }
}

/// Insert payload for a permission set row.
#[derive(Debug, Clone)]
pub struct NewPermissionSet {
    pub name: String,
    pub description: Option<String>,
    pub locked: bool,
}

/// Permission set creation request; may pre-populate members and pre-lock.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePermissionSet {
    #[validate(length(min = 2, max = 80, message = "Set name must be 2-80 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub permission_ids: Vec<i64>,
}

/// Permission set update request (membership changes go through add/remove)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePermissionSet {
    pub id: i64,
    #[validate(length(min = 2, max = 80, message = "Set name must be 2-80 characters"))]
    pub name: String,
    pub description: Option<String>,
}
