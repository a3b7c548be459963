//! Response envelope and the mapping from domain errors to HTTP statuses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use shared::ApiResponse;
use tracing::{error, warn};

use crate::domain::DomainError;

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// 200 with `data`
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::ok(data))))
}

/// 201 with `data`
pub fn created<T: Serialize>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(data))))
}

/// Body of an endpoint where the payload may be omitted entirely. A request
/// without a JSON body gets `T::default()`; a malformed one is still rejected.
pub fn optional_body<T: Default>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(rejection.into()),
    }
}

/// A failed request, rendered as `{ success: false, message }`
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_)
            | DomainError::DuplicateIdentifier(_)
            | DomainError::DuplicateCageNumber(_)
            | DomainError::DuplicateUser(_)
            | DomainError::InvalidTransition(_)
            | DomainError::AlreadySold
            | DomainError::InUse(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DomainError::validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            DomainError::Internal(e) => {
                error!("Internal error: {:#}", e);
                "Internal server error".to_string()
            }
            other => {
                warn!("Request failed with {}: {}", status, other);
                other.to_string()
            }
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

pub async fn health() -> ApiResult<&'static str> {
    ok("ok")
}

/// Fallback for unknown routes
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("Route not found")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::validation("bad"), StatusCode::BAD_REQUEST),
            (DomainError::DuplicateIdentifier("B1".into()), StatusCode::BAD_REQUEST),
            (DomainError::AlreadySold, StatusCode::BAD_REQUEST),
            (DomainError::InUse("cage".into()), StatusCode::BAD_REQUEST),
            (DomainError::unauthorized("no"), StatusCode::UNAUTHORIZED),
            (DomainError::not_found("gone"), StatusCode::NOT_FOUND),
            (
                DomainError::Internal(anyhow::anyhow!("disk on fire")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = ApiError(DomainError::Internal(anyhow::anyhow!("secret path"))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
