//! Core business entities and value objects.
//!
//! Domain types are plain data plus the few invariant-preserving helpers
//! each aggregate needs. Persistence models live in `infra` and are
//! converted with explicit functions, never a reflection mapper.

mod audit;
mod branch;
mod crypto;
mod password;
mod permission;
mod permission_set;
mod role;
mod user;

pub use audit::{AuditLog, NewAuditLog};
pub use branch::{Branch, CreateBranch, NewBranch, UpdateBranch};
pub use crypto::FieldCipher;
pub use password::Password;
pub use permission::{Permission, UpdatePermission};
pub use permission_set::{
    CreatePermissionSet, NewPermissionSet, PermissionSet, PermissionSetView, UpdatePermissionSet,
};
pub use role::{CreateRole, NewRole, Role, UpdateRole};
pub use user::{ChangePassword, CreateUser, NewUser, UpdateUser, User, UserResponse};
