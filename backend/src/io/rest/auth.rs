use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;

use super::response::ApiError;
use crate::domain::DomainError;
use crate::AppState;

/// The authenticated caller, resolved from `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| DomainError::unauthorized("Authentication required"))?;

        match state.identity.resolve(token).await? {
            Some(user_id) => {
                debug!("Authenticated request for user {}", user_id);
                Ok(CurrentUser { user_id })
            }
            None => Err(DomainError::unauthorized("Invalid or expired token").into()),
        }
    }
}
