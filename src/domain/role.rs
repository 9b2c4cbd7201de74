//! Roles: named bundles of permission sets assignable to users.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub deleted: bool,
}

/// Insert payload for a role row.
#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub description: Option<String>,
}

/// Role creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRole {
    #[validate(length(min = 2, max = 120, message = "Role name must be 2-120 characters"))]
    pub name: String,
    pub description: Option<String>,
}

/// Role update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRole {
    pub id: i64,
    #[validate(length(min = 2, max = 120, message = "Role name must be 2-120 characters"))]
    pub name: String,
    pub description: Option<String>,
}
