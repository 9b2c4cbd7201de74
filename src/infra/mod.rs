//! Infrastructure: database bootstrap, migrations and repositories.

pub mod db;
pub mod repositories;

pub use db::Database;
