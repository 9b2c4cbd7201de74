//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{self, AccessFacade};

/// Application state shared across handlers.
///
/// Handlers only see the facade; service and repository wiring happens
/// in `services::from_connection`.
#[derive(Clone)]
pub struct AppState {
    pub facade: Arc<AccessFacade>,
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let facade = services::from_connection(database.get_connection(), config);
        Self { facade, database }
    }

    /// Create application state with a manually injected facade.
    pub fn new(facade: Arc<AccessFacade>, database: Arc<Database>) -> Self {
        Self { facade, database }
    }
}
