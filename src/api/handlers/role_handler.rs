//! Role handlers.

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
use crate::domain::{CreateRole, PermissionSet, Role, UpdateRole};
use crate::errors::AppResult;

#[derive(Debug, Deserialize)]
pub struct SetIdsRequest {
    pub set_ids: Vec<i64>,
}

/// Create role routes
pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list).put(update))
        .route("/:id", get(get_by_id).delete(soft_delete))
        .route("/name/:name", get(get_by_name))
        .route(
            "/:id/permission-sets",
            get(permission_sets).post(grant_permission_sets),
        )
        .route("/:id/permission-sets/deny", post(deny_permission_sets))
        .route("/:id/purge", delete(purge))
}

pub async fn create(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    ValidatedJson(payload): ValidatedJson<CreateRole>,
) -> AppResult<(StatusCode, Json<Role>)> {
    let role = state
        .facade
        .create_role(payload, actor_id, &origin_ip)
        .await?;
    Ok((StatusCode::CREATED, Json(role)))
}

pub async fn list(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
) -> AppResult<Json<Vec<Role>>> {
    let roles = state.facade.list_roles(actor_id, &origin_ip).await?;
    Ok(Json(roles))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
) -> AppResult<Json<Role>> {
    let role = state.facade.get_role(id, actor_id, &origin_ip).await?;
    Ok(Json(role))
}

pub async fn get_by_name(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(name): Path<String>,
) -> AppResult<Json<Role>> {
    let role = state
        .facade
        .get_role_by_name(&name, actor_id, &origin_ip)
        .await?;
    Ok(Json(role))
}

pub async fn update(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    ValidatedJson(payload): ValidatedJson<UpdateRole>,
) -> AppResult<Json<Role>> {
    let role = state
        .facade
        .update_role(payload, actor_id, &origin_ip)
        .await?;
    Ok(Json(role))
}

pub async fn permission_sets(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<PermissionSet>>> {
    let sets = state
        .facade
        .role_permission_sets(id, actor_id, &origin_ip)
        .await?;
    Ok(Json(sets))
}

pub async fn grant_permission_sets(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
    Json(payload): Json<SetIdsRequest>,
) -> AppResult<Json<Vec<PermissionSet>>> {
    let granted = state
        .facade
        .grant_permission_sets(id, payload.set_ids, actor_id, &origin_ip)
        .await?;
    Ok(Json(granted))
}

pub async fn deny_permission_sets(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
    Json(payload): Json<SetIdsRequest>,
) -> AppResult<StatusCode> {
    state
        .facade
        .deny_permission_sets(id, payload.set_ids, actor_id, &origin_ip)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn soft_delete(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.facade.delete_role(id, actor_id, &origin_ip).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn purge(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.facade.purge_role(id, actor_id, &origin_ip).await?;
    Ok(StatusCode::NO_CONTENT)
}
