//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod audit_log;
pub mod branch;
pub mod permission;
pub mod permission_set;
pub mod permission_set_permission;
pub mod role;
pub mod role_permission_set;
pub mod user;

// Re-exports for repository convenience
#[allow(unused_imports)]
pub use audit_log::{ActiveModel as AuditLogActiveModel, Entity as AuditLogEntity, Model as AuditLogModel};
#[allow(unused_imports)]
pub use branch::{ActiveModel as BranchActiveModel, Entity as BranchEntity, Model as BranchModel};
#[allow(unused_imports)]
pub use permission::{ActiveModel as PermissionActiveModel, Entity as PermissionEntity, Model as PermissionModel};
#[allow(unused_imports)]
pub use permission_set::{
    ActiveModel as PermissionSetActiveModel, Entity as PermissionSetEntity, Model as PermissionSetModel,
};
#[allow(unused_imports)]
pub use permission_set_permission::{
    ActiveModel as SetPermissionActiveModel, Entity as SetPermissionEntity, Model as SetPermissionModel,
};
#[allow(unused_imports)]
pub use role::{ActiveModel as RoleActiveModel, Entity as RoleEntity, Model as RoleModel};
#[allow(unused_imports)]
pub use role_permission_set::{
    ActiveModel as RoleSetActiveModel, Entity as RoleSetEntity, Model as RoleSetModel,
};
#[allow(unused_imports)]
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
