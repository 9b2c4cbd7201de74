//! Audit log entries.
//!
//! Entries are append-only: once written they are never updated or deleted.
//! Every entry references a resolvable acting user; operations whose actor
//! does not resolve fail before any entry is written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: i64,
    pub action: String,
    pub ip_address: String,
    pub logged_at: DateTime<Utc>,
    pub user_id: i64,
}

/// Insert payload for an audit row.
#[derive(Debug, Clone)]
pub struct NewAuditLog {
    pub action: String,
    pub ip_address: String,
    pub logged_at: DateTime<Utc>,
    pub user_id: i64,
}

impl NewAuditLog {
    pub fn now(user_id: i64, action: impl Into<String>, ip_address: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ip_address: ip_address.into(),
            logged_at: Utc::now(),
            user_id,
        }
    }
}
