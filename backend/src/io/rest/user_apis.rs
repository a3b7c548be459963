use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use tracing::info;

use super::auth::CurrentUser;
use super::mappers::UserMapper;
use super::response::{created, ok, ApiResult};
use crate::AppState;
use shared::{RegisterUserRequest, RegisterUserResponse, User};

/// Register a user and return a bearer token for them
pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> ApiResult<RegisterUserResponse> {
    let Json(request) = payload?;
    info!("POST /api/users - national id {}", request.national_id);

    let registered = state
        .user_service
        .register(UserMapper::to_register_command(request))
        .await?;
    created(UserMapper::to_registered_dto(registered))
}

pub async fn current_user(State(state): State<AppState>, user: CurrentUser) -> ApiResult<User> {
    info!("GET /api/users/me");
    let profile = state.user_service.me(&user.user_id).await?;
    ok(UserMapper::to_dto(profile))
}
