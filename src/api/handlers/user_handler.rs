//! User handlers.

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
use crate::domain::{ChangePassword, CreateUser, UpdateUser, UserResponse};
use crate::errors::AppResult;

use super::branch_handler::StatusRequest;

#[derive(Debug, Deserialize)]
pub struct LoginStatusRequest {
    pub logged_in: bool,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list).put(update))
        .route("/password", put(change_password))
        .route("/:id", get(get_by_id).delete(soft_delete))
        .route("/username/:username", get(get_by_username))
        .route("/pf/:pf_no", get(get_by_pf_no))
        .route("/:id/activate", put(activate))
        .route("/:id/verify", put(verify))
        .route("/:id/login-status", put(set_login_status))
}

pub async fn create(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    ValidatedJson(payload): ValidatedJson<CreateUser>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .facade
        .create_user(payload, actor_id, &origin_ip)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.facade.list_users(actor_id, &origin_ip).await?;
    Ok(Json(users))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let user = state.facade.get_user(id, actor_id, &origin_ip).await?;
    Ok(Json(user))
}

pub async fn get_by_username(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .facade
        .get_user_by_username(&username, actor_id, &origin_ip)
        .await?;
    Ok(Json(user))
}

pub async fn get_by_pf_no(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(pf_no): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .facade
        .get_user_by_pf_no(&pf_no, actor_id, &origin_ip)
        .await?;
    Ok(Json(user))
}

pub async fn update(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    ValidatedJson(payload): ValidatedJson<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .facade
        .update_user(payload, actor_id, &origin_ip)
        .await?;
    Ok(Json(user))
}

pub async fn activate(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .facade
        .activate_user(id, payload.status, actor_id, &origin_ip)
        .await?;
    Ok(Json(user))
}

pub async fn verify(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let user = state.facade.verify_user(id, actor_id, &origin_ip).await?;
    Ok(Json(user))
}

pub async fn set_login_status(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
    Json(payload): Json<LoginStatusRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .facade
        .set_login_status(id, payload.logged_in, actor_id, &origin_ip)
        .await?;
    Ok(Json(user))
}

pub async fn change_password(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    ValidatedJson(payload): ValidatedJson<ChangePassword>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .facade
        .change_password(payload, actor_id, &origin_ip)
        .await?;
    Ok(Json(user))
}

pub async fn soft_delete(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    OriginIp(origin_ip): OriginIp,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.facade.delete_user(id, actor_id, &origin_ip).await?;
    Ok(StatusCode::NO_CONTENT)
}
