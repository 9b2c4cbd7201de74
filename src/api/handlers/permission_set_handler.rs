//! Permission set handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;

use crate::api::extractors::{ActorId, OriginIp, ValidatedJson};
use crate::api::AppState;
use crate::domain::{CreatePermissionSet, PermissionSet, PermissionSetView, UpdatePermissionSet};
use crate::errors::AppResult;

#[derive(Debug, Deserialize)]
pub struct AddPermissionsRequest {
    pub permission_ids: Vec<i64>,
    #[serde(default)]
    pub lock: bool,
}

#[derive(Debug, Deserialize)]
pub struct RemovePermissionsRequest {
    pub permission_ids: Vec<i64>,
}

/// Create permission set routes
pub fn permission_set_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list).put(update))
        .route("/:id", get(get_by_id).delete(soft_delete))
        .route("/name/:name", get(get_by_name))
        .route("/:id/permissions", post(add_permissions))
        .route("/:id/permissions/remove", post(remove_permissions))
        .route("/:id/lock", put(lock))
        .route("/:id/purge", delete(purge))
}

pub async fn create(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    ValidatedJson(payload): ValidatedJson<CreatePermissionSet>,
) -> AppResult<(StatusCode, Json<PermissionSetView>)> {
    let set = state
        .facade
        .create_permission_set(payload, actor_id, &origin_ip)
        .await?;
    Ok((StatusCode::CREATED, Json(set)))
}

pub async fn list(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
) -> AppResult<Json<Vec<PermissionSet>>> {
    let sets = state
        .facade
        .list_permission_sets(actor_id, &origin_ip)
        .await?;
    Ok(Json(sets))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
) -> AppResult<Json<PermissionSetView>> {
    let set = state
        .facade
        .get_permission_set(id, actor_id, &origin_ip)
        .await?;
    Ok(Json(set))
}

pub async fn get_by_name(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(name): Path<String>,
) -> AppResult<Json<PermissionSetView>> {
    let set = state
        .facade
        .get_permission_set_by_name(&name, actor_id, &origin_ip)
        .await?;
    Ok(Json(set))
}

pub async fn update(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    ValidatedJson(payload): ValidatedJson<UpdatePermissionSet>,
) -> AppResult<Json<PermissionSet>> {
    let set = state
        .facade
        .update_permission_set(payload, actor_id, &origin_ip)
        .await?;
    Ok(Json(set))
}

pub async fn add_permissions(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
    Json(payload): Json<AddPermissionsRequest>,
) -> AppResult<Json<PermissionSetView>> {
    let set = state
        .facade
        .add_permissions_to_set(
            id,
            payload.permission_ids,
            payload.lock,
            actor_id,
            &origin_ip,
        )
        .await?;
    Ok(Json(set))
}

pub async fn remove_permissions(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
    Json(payload): Json<RemovePermissionsRequest>,
) -> AppResult<Json<PermissionSetView>> {
    let set = state
        .facade
        .remove_permissions_from_set(id, payload.permission_ids, actor_id, &origin_ip)
        .await?;
    Ok(Json(set))
}

pub async fn lock(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
) -> AppResult<Json<PermissionSetView>> {
    let set = state
        .facade
        .lock_permission_set(id, actor_id, &origin_ip)
        .await?;
    Ok(Json(set))
}

pub async fn soft_delete(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state
        .facade
        .delete_permission_set(id, actor_id, &origin_ip)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn purge(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state
        .facade
        .purge_permission_set(id, actor_id, &origin_ip)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
