//! HTTP handlers, one module per resource.

pub mod branch_handler;
pub mod log_handler;
pub mod permission_handler;
pub mod permission_set_handler;
pub mod role_handler;
pub mod user_handler;

pub use branch_handler::branch_routes;
pub use log_handler::log_routes;
pub use permission_handler::permission_routes;
pub use permission_set_handler::permission_set_routes;
pub use role_handler::role_routes;
pub use user_handler::user_routes;
