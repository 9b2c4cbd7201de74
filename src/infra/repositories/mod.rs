//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod audit_log_repository;
mod branch_repository;
pub(crate) mod entities;
mod permission_repository;
mod permission_set_repository;
mod role_repository;
mod user_repository;

pub use audit_log_repository::{AuditLogRepository, AuditLogStore};
pub use branch_repository::{BranchRepository, BranchStore};
pub use permission_repository::{PermissionRepository, PermissionStore};
pub use permission_set_repository::{PermissionSetRepository, PermissionSetStore};
pub use role_repository::{RoleRepository, RoleStore};
pub use user_repository::{UserRepository, UserStore};

// Mocks are generated per-trait for unit tests
#[cfg(test)]
pub use audit_log_repository::MockAuditLogRepository;
#[cfg(test)]
pub use branch_repository::MockBranchRepository;
#[cfg(test)]
pub use permission_repository::MockPermissionRepository;
#[cfg(test)]
pub use permission_set_repository::MockPermissionSetRepository;
#[cfg(test)]
pub use role_repository::MockRoleRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
