//! # REST API for the Bird Registry
//!
//! Bird records plus the marketplace operations: listing a bird for sale,
//! selling it to an external buyer and purchasing a listed bird.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use tracing::info;

use super::auth::CurrentUser;
use super::mappers::BirdMapper;
use super::response::{created, ok, optional_body, ApiResult};
use crate::AppState;
use shared::{
    Bird, CreateBirdRequest, DeletedResponse, MarkForSaleRequest, PurchaseBirdRequest,
    SellBirdRequest, SoldTotalsResponse, UpdateBirdRequest,
};

/// Create a bird owned by the caller
pub async fn create_bird(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<CreateBirdRequest>, JsonRejection>,
) -> ApiResult<Bird> {
    let Json(request) = payload?;
    info!("POST /api/birds - request: {:?}", request);

    let bird = state
        .bird_service
        .create_bird(&user.user_id, BirdMapper::to_create_command(request))
        .await?;
    created(BirdMapper::to_dto(bird))
}

/// The caller's birds and the birds they sold on, excluding for-sale listings
pub async fn list_birds(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Vec<Bird>> {
    info!("GET /api/birds");
    let birds = state.bird_service.list_birds(&user.user_id).await?;
    ok(BirdMapper::to_dto_list(birds))
}

pub async fn get_bird(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(bird_id): Path<String>,
) -> ApiResult<Bird> {
    info!("GET /api/birds/{}", bird_id);
    let bird = state.bird_service.get_bird(&bird_id).await?;
    ok(BirdMapper::to_dto(bird))
}

pub async fn update_bird(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(bird_id): Path<String>,
    payload: Result<Json<UpdateBirdRequest>, JsonRejection>,
) -> ApiResult<Bird> {
    let Json(request) = payload?;
    info!("PUT /api/birds/{} - request: {:?}", bird_id, request);

    let bird = state
        .bird_service
        .update_bird(&bird_id, &user.user_id, BirdMapper::to_update_command(request))
        .await?;
    ok(BirdMapper::to_dto(bird))
}

pub async fn delete_bird(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(bird_id): Path<String>,
) -> ApiResult<DeletedResponse> {
    info!("DELETE /api/birds/{}", bird_id);
    state.bird_service.delete_bird(&bird_id, &user.user_id).await?;
    ok(DeletedResponse { id: bird_id })
}

pub async fn mark_for_sale(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(bird_id): Path<String>,
    payload: Result<Json<MarkForSaleRequest>, JsonRejection>,
) -> ApiResult<Bird> {
    let request = optional_body(payload)?;
    info!("PUT /api/birds/{}/mark-for-sale - request: {:?}", bird_id, request);

    let bird = state
        .bird_service
        .mark_for_sale(&bird_id, &user.user_id, request.asking_price)
        .await?;
    ok(BirdMapper::to_dto(bird))
}

pub async fn sell_bird(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(bird_id): Path<String>,
    payload: Result<Json<SellBirdRequest>, JsonRejection>,
) -> ApiResult<Bird> {
    let Json(request) = payload?;
    info!("PUT /api/birds/{}/sell - request: {:?}", bird_id, request);

    let bird = state
        .bird_service
        .sell_bird(&bird_id, &user.user_id, BirdMapper::to_sell_command(request))
        .await?;
    ok(BirdMapper::to_dto(bird))
}

pub async fn purchase_bird(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(bird_id): Path<String>,
    payload: Result<Json<PurchaseBirdRequest>, JsonRejection>,
) -> ApiResult<Bird> {
    let request = optional_body(payload)?;
    info!("PUT /api/birds/{}/purchase - request: {:?}", bird_id, request);

    let bird = state
        .bird_service
        .purchase_bird(&bird_id, &user.user_id, BirdMapper::to_purchase_command(request))
        .await?;
    ok(BirdMapper::to_dto(bird))
}

/// Marketplace: every unsold bird listed for sale
pub async fn list_for_sale(State(state): State<AppState>, _user: CurrentUser) -> ApiResult<Vec<Bird>> {
    info!("GET /api/birds/for-sale");
    let birds = state.bird_service.list_for_sale().await?;
    ok(BirdMapper::to_dto_list(birds))
}

pub async fn list_available(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Vec<Bird>> {
    info!("GET /api/birds/available");
    let birds = state.bird_service.list_available(&user.user_id).await?;
    ok(BirdMapper::to_dto_list(birds))
}

pub async fn list_sold(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Vec<Bird>> {
    info!("GET /api/birds/sold");
    let birds = state.bird_service.list_sold(&user.user_id).await?;
    ok(BirdMapper::to_dto_list(birds))
}

pub async fn total_sold(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<SoldTotalsResponse> {
    info!("GET /api/birds/total-sold");
    let totals = state.bird_service.sold_totals(&user.user_id).await?;
    ok(BirdMapper::to_totals_dto(totals))
}
