//! Branch site records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A physical site identified by a unique site code (`sol_id`) and name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,
    pub sol_id: String,
    pub name: String,
    pub active: bool,
    pub deleted: bool,
    pub created_on: DateTime<Utc>,
}

/// Insert payload for a branch row.
#[derive(Debug, Clone)]
pub struct NewBranch {
    pub sol_id: String,
    pub name: String,
    pub active: bool,
}

/// Branch creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBranch {
    #[validate(
        length(min = 2, max = 10, message = "SolId must be 2-10 characters"),
        custom(function = "alphanumeric", message = "SolId must be alphanumeric")
    )]
    pub sol_id: String,
    #[validate(length(min = 2, max = 120, message = "Branch name must be 2-120 characters"))]
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

/// Branch update request (full overwrite, keyed by id)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBranch {
    pub id: i64,
    #[validate(
        length(min = 2, max = 10, message = "SolId must be 2-10 characters"),
        custom(function = "alphanumeric", message = "SolId must be alphanumeric")
    )]
    pub sol_id: String,
    #[validate(length(min = 2, max = 120, message = "Branch name must be 2-120 characters"))]
    pub name: String,
    pub active: bool,
}

fn alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanumeric"))
    }
}
