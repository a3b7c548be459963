//! # REST API for Nests

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use tracing::info;

use super::auth::CurrentUser;
use super::mappers::NestMapper;
use super::response::{created, ok, ApiResult};
use crate::AppState;
use shared::{CreateNestRequest, DeletedResponse, Nest, UpdateNestRequest};

pub async fn create_nest(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<CreateNestRequest>, JsonRejection>,
) -> ApiResult<Nest> {
    let Json(request) = payload?;
    info!("POST /api/nests - request: {:?}", request);

    let nest = state
        .nest_service
        .create_nest(&user.user_id, NestMapper::to_create_command(request))
        .await?;
    created(NestMapper::to_dto(nest))
}

pub async fn list_nests(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Vec<Nest>> {
    info!("GET /api/nests");
    let nests = state.nest_service.list_nests(&user.user_id).await?;
    ok(nests.into_iter().map(NestMapper::to_dto).collect())
}

pub async fn get_nest(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(nest_id): Path<String>,
) -> ApiResult<Nest> {
    info!("GET /api/nests/{}", nest_id);
    let nest = state.nest_service.get_nest(&nest_id, &user.user_id).await?;
    ok(NestMapper::to_dto(nest))
}

pub async fn update_nest(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(nest_id): Path<String>,
    payload: Result<Json<UpdateNestRequest>, JsonRejection>,
) -> ApiResult<Nest> {
    let Json(request) = payload?;
    info!("PUT /api/nests/{} - request: {:?}", nest_id, request);

    let nest = state
        .nest_service
        .update_nest(&nest_id, &user.user_id, NestMapper::to_update_command(request))
        .await?;
    ok(NestMapper::to_dto(nest))
}

pub async fn delete_nest(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(nest_id): Path<String>,
) -> ApiResult<DeletedResponse> {
    info!("DELETE /api/nests/{}", nest_id);
    state.nest_service.delete_nest(&nest_id, &user.user_id).await?;
    ok(DeletedResponse { id: nest_id })
}
