//! Atomic permissions.
//!
//! A permission's `locked` flag is derived state: it follows the lock of
//! whichever permission set it is added to or removed from. The catalog
//! never toggles it directly.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub locked: bool,
}

/// Permission update request (name/description only; lock state is derived)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePermission {
    pub id: i64,
    #[validate(length(min = 2, max = 80, message = "Permission name must be 2-80 characters"))]
    pub name: String,
    pub description: Option<String>,
}
