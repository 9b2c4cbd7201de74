//! Branch handlers.

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
use crate::domain::{Branch, CreateBranch, UpdateBranch};
use crate::errors::AppResult;

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: bool,
}

/// Create branch routes
pub fn branch_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list).put(update))
        .route("/sol/:sol_id", get(get_by_sol_id))
        .route("/:id", delete(soft_delete))
        .route("/:id/activate", put(activate))
        .route("/:id/purge", delete(purge))
}

pub async fn create(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    ValidatedJson(payload): ValidatedJson<CreateBranch>,
) -> AppResult<(StatusCode, Json<Branch>)> {
    let branch = state
        .facade
        .create_branch(payload, actor_id, &origin_ip)
        .await?;
    Ok((StatusCode::CREATED, Json(branch)))
}

pub async fn list(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
) -> AppResult<Json<Vec<Branch>>> {
    let branches = state.facade.list_branches(actor_id, &origin_ip).await?;
    Ok(Json(branches))
}

pub async fn get_by_sol_id(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(sol_id): Path<String>,
) -> AppResult<Json<Branch>> {
    let branch = state
        .facade
        .get_branch(&sol_id, actor_id, &origin_ip)
        .await?;
    Ok(Json(branch))
}

pub async fn update(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    ValidatedJson(payload): ValidatedJson<UpdateBranch>,
) -> AppResult<Json<Branch>> {
    let branch = state
        .facade
        .update_branch(payload, actor_id, &origin_ip)
        .await?;
    Ok(Json(branch))
}

pub async fn activate(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<Json<Branch>> {
    let branch = state
        .facade
        .activate_branch(id, payload.status, actor_id, &origin_ip)
        .await?;
    Ok(Json(branch))
}

pub async fn soft_delete(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.facade.delete_branch(id, actor_id, &origin_ip).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn purge(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.facade.purge_branch(id, actor_id, &origin_ip).await?;
    Ok(StatusCode::NO_CONTENT)
}
