//! User aggregate and related request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// System user bound to exactly one branch and one role.
///
/// `email`, `first_name` and `last_name` hold ciphertext at rest; the
/// access facade decrypts them on the read path. `password_hash` never
/// leaves the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub pf_no: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub branch_id: i64,
    pub role_id: i64,
    pub active: bool,
    pub verified: bool,
    pub deleted: bool,
    pub logged_in: bool,
    pub verified_by: Option<String>,
    pub created_by: String,
    pub created_on: DateTime<Utc>,
    pub modified_by: Option<String>,
    pub modified_on: DateTime<Utc>,
}

impl User {
    /// Whether `username` is the creator of this record.
    ///
    /// Usernames are looked up case-insensitively everywhere else, so the
    /// self-verification rule compares them case-insensitively too.
    pub fn created_by_matches(&self, username: &str) -> bool {
        self.created_by.eq_ignore_ascii_case(username)
    }
}

/// Insert payload for a user row; the id is generated by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub pf_no: String,
    pub email: String,
    pub password_hash: String,
    pub branch_id: i64,
    pub role_id: i64,
    pub created_by: String,
}

/// User creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 2, max = 80, message = "Username must be 2-80 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 80, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 80, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, max = 10, message = "Gender is required"))]
    pub gender: String,
    #[validate(length(min = 2, max = 10, message = "PF number must be 2-10 characters"))]
    pub pf_no: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub branch_id: i64,
    pub role_id: i64,
}

/// User update request (branch/role bindings re-validated by the facade)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUser {
    pub id: i64,
    #[validate(length(min = 2, max = 80, message = "Username must be 2-80 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 80, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 80, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, max = 10, message = "Gender is required"))]
    pub gender: String,
    #[validate(length(min = 2, max = 10, message = "PF number must be 2-10 characters"))]
    pub pf_no: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub branch_id: i64,
    pub role_id: i64,
}

/// Password change request; the old password must verify first.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePassword {
    pub id: i64,
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// User record as returned to callers (PII decrypted, credential omitted)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub pf_no: String,
    pub email: String,
    pub branch_id: i64,
    pub role_id: i64,
    pub active: bool,
    pub verified: bool,
    pub deleted: bool,
    pub logged_in: bool,
    pub verified_by: Option<String>,
    pub created_by: String,
    pub created_on: DateTime<Utc>,
    pub modified_by: Option<String>,
    pub modified_on: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            gender: user.gender,
            pf_no: user.pf_no,
            email: user.email,
            branch_id: user.branch_id,
            role_id: user.role_id,
            active: user.active,
            verified: user.verified,
            deleted: user.deleted,
            logged_in: user.logged_in,
            verified_by: user.verified_by,
            created_by: user.created_by,
            created_on: user.created_on,
            modified_by: user.modified_by,
            modified_on: user.modified_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "jdoe".into(),
            first_name: "enc".into(),
            last_name: "enc".into(),
            gender: "F".into(),
            pf_no: "PF001".into(),
            email: "enc".into(),
            password_hash: "hash".into(),
            branch_id: 1,
            role_id: 1,
            active: false,
            verified: false,
            deleted: false,
            logged_in: false,
            verified_by: None,
            created_by: "Admin".into(),
            created_on: Utc::now(),
            modified_by: None,
            modified_on: Utc::now(),
        }
    }

    #[test]
    fn creator_check_ignores_case() {
        let user = sample_user();
        assert!(user.created_by_matches("admin"));
        assert!(user.created_by_matches("ADMIN"));
        assert!(!user.created_by_matches("other"));
    }
}
