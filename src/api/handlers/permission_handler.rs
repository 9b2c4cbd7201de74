//! Permission catalog handlers.
//!
//! The catalog is read-mostly: entries are seeded out of band, so there
//! is no create or delete route here.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::{ActorId, OriginIp, ValidatedJson};
use crate::api::AppState;
use crate::domain::{Permission, UpdatePermission};
use crate::errors::AppResult;

/// Create permission routes
pub fn permission_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).put(update))
        .route("/:id", get(get_by_id))
        .route("/name/:name", get(get_by_name))
}

pub async fn list(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
) -> AppResult<Json<Vec<Permission>>> {
    let permissions = state.facade.list_permissions(actor_id, &origin_ip).await?;
    Ok(Json(permissions))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
) -> AppResult<Json<Permission>> {
    let permission = state
        .facade
        .get_permission(id, actor_id, &origin_ip)
        .await?;
    Ok(Json(permission))
}

pub async fn get_by_name(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(name): Path<String>,
) -> AppResult<Json<Permission>> {
    let permission = state
        .facade
        .get_permission_by_name(&name, actor_id, &origin_ip)
        .await?;
    Ok(Json(permission))
}

pub async fn update(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    ValidatedJson(payload): ValidatedJson<UpdatePermission>,
) -> AppResult<Json<Permission>> {
    let permission = state
        .facade
        .update_permission(payload, actor_id, &origin_ip)
        .await?;
    Ok(Json(permission))
}
