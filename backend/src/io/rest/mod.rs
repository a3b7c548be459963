//! # REST API Interface Layer
//!
//! HTTP endpoints of the breeding farm, mounted under `/api`. Handlers
//! authenticate the caller through [`auth::CurrentUser`], map the `shared`
//! DTOs to domain commands, call one service and wrap the result in the
//! `{ success, data, message }` envelope. Domain errors become HTTP statuses in
//! [`response::ApiError`].

pub mod auth;
pub mod bird_apis;
pub mod cage_apis;
pub mod mappers;
pub mod nest_apis;
pub mod pair_apis;
pub mod response;
pub mod user_apis;

pub use auth::CurrentUser;
pub use bird_apis::*;
pub use cage_apis::*;
pub use nest_apis::*;
pub use pair_apis::*;
pub use response::{health, not_found, ApiError, ApiResult};
pub use user_apis::*;
