use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use tracing::info;

use super::auth::CurrentUser;
use super::mappers::PairMapper;
use super::response::{created, ok, ApiResult};
use crate::AppState;
use shared::{CreatePairRequest, PairsResponse, ProposedPair};

/// Unsold birds grouped by species into males and females
pub async fn list_pairs(State(state): State<AppState>, user: CurrentUser) -> ApiResult<PairsResponse> {
    info!("GET /api/pairs");
    let groups = state.pairs_service.group_by_species(&user.user_id).await?;
    ok(PairMapper::to_groups_dto(groups))
}

/// Check a candidate pairing; nothing is stored
pub async fn propose_pair(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<CreatePairRequest>, JsonRejection>,
) -> ApiResult<ProposedPair> {
    let Json(request) = payload?;
    info!("POST /api/pairs - request: {:?}", request);

    let pair = state
        .pairs_service
        .propose_pair(&user.user_id, PairMapper::to_propose_command(request))
        .await?;
    created(PairMapper::to_proposed_dto(pair))
}
