//! Audit log handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::extractors::{ActorId, OriginIp};
use crate::api::AppState;
use crate::domain::AuditLog;
use crate::errors::AppResult;

#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Create audit log routes
pub fn log_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/range", get(list_between))
}

pub async fn list(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
) -> AppResult<Json<Vec<AuditLog>>> {
    let logs = state.facade.list_logs(actor_id, &origin_ip).await?;
    Ok(Json(logs))
}

pub async fn list_between(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Query(range): Query<RangeParams>,
) -> AppResult<Json<Vec<AuditLog>>> {
    let logs = state
        .facade
        .list_logs_between(range.start, range.end, actor_id, &origin_ip)
        .await?;
    Ok(Json(logs))
}
