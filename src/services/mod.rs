//! Application services layer - use cases and business logic.
//!
//! One service trait + manager per aggregate, an audit service every
//! mutation goes through, and the access facade the API layer calls.
//! Services depend on repository traits for dependency inversion.

mod audit_service;
mod branch_service;
pub mod container;
mod facade;
mod permission_service;
mod permission_set_service;
mod role_service;
mod user_service;

pub use audit_service::{AuditService, Auditor};
pub use branch_service::{BranchManager, BranchService};
pub use facade::AccessFacade;
pub use permission_service::{PermissionManager, PermissionService};
pub use permission_set_service::{PermissionSetManager, PermissionSetService};
pub use role_service::{RoleManager, RoleService};
pub use user_service::{UserManager, UserService};

pub use container::from_connection;
