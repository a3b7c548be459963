//! # REST API for Breeding Cages

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use tracing::info;

use super::auth::CurrentUser;
use super::mappers::CageMapper;
use super::response::{created, ok, ApiResult};
use crate::AppState;
use shared::{Cage, CreateCageRequest, DeletedResponse, UpdateCageRequest};

pub async fn create_cage(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<CreateCageRequest>, JsonRejection>,
) -> ApiResult<Cage> {
    let Json(request) = payload?;
    info!("POST /api/cages - request: {:?}", request);

    let cage = state
        .cage_service
        .create_cage(&user.user_id, CageMapper::to_create_command(request))
        .await?;
    created(CageMapper::to_dto(cage))
}

pub async fn list_cages(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Vec<Cage>> {
    info!("GET /api/cages");
    let cages = state.cage_service.list_cages(&user.user_id).await?;
    ok(cages.into_iter().map(CageMapper::to_dto).collect())
}

pub async fn update_cage(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(cage_id): Path<String>,
    payload: Result<Json<UpdateCageRequest>, JsonRejection>,
) -> ApiResult<Cage> {
    let Json(request) = payload?;
    info!("PUT /api/cages/{} - request: {:?}", cage_id, request);

    let cage = state
        .cage_service
        .update_cage(&cage_id, &user.user_id, CageMapper::to_update_command(request))
        .await?;
    ok(CageMapper::to_dto(cage))
}

pub async fn delete_cage(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(cage_id): Path<String>,
) -> ApiResult<DeletedResponse> {
    info!("DELETE /api/cages/{}", cage_id);
    state.cage_service.delete_cage(&cage_id, &user.user_id).await?;
    ok(DeletedResponse { id: cage_id })
}
