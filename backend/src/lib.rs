//! # Aviary Backend
//!
//! REST backend of a bird breeding farm: birds and their sale/transfer
//! lifecycle, breeding cages, nests and a computed pairing view.
//!
//! The crate is layered the usual way:
//!
//! - [`storage`]: storage traits and their SQLite implementation
//! - [`domain`]: services holding the business rules
//! - [`io`]: axum handlers, DTO mappers and error-to-status mapping
//!
//! [`initialize_backend`] wires the layers together and [`create_router`]
//! exposes them over HTTP.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{BirdService, CageService, IdentityProvider, NestService, PairsService, UserService};
use crate::storage::DbConnection;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub bird_service: BirdService<DbConnection>,
    pub cage_service: CageService<DbConnection>,
    pub nest_service: NestService<DbConnection>,
    pub pairs_service: PairsService<DbConnection>,
    pub user_service: UserService<DbConnection>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(db_conn: Arc<DbConnection>) -> Self {
        let user_service = UserService::new(db_conn.clone());
        Self {
            bird_service: BirdService::new(db_conn.clone()),
            cage_service: CageService::new(db_conn.clone()),
            nest_service: NestService::new(db_conn.clone()),
            pairs_service: PairsService::new(db_conn),
            identity: Arc::new(user_service.clone()),
            user_service,
        }
    }
}

/// Open the database and build all services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db_conn = Arc::new(DbConnection::new(&config.database_url).await?);

    info!("Setting up domain services");
    Ok(AppState::new(db_conn))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: Option<HeaderValue>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);
    let cors = match cors_origin {
        Some(origin) => cors.allow_origin(origin),
        None => cors.allow_origin(Any),
    };

    let api_routes = Router::new()
        .route("/health", get(io::health))
        .route("/users", post(io::register_user))
        .route("/users/me", get(io::current_user))
        .route("/birds", get(io::list_birds).post(io::create_bird))
        .route("/birds/sold", get(io::list_sold))
        .route("/birds/for-sale", get(io::list_for_sale))
        .route("/birds/available", get(io::list_available))
        .route("/birds/total-sold", get(io::total_sold))
        .route(
            "/birds/:id",
            get(io::get_bird).put(io::update_bird).delete(io::delete_bird),
        )
        .route("/birds/:id/sell", put(io::sell_bird))
        .route("/birds/:id/mark-for-sale", put(io::mark_for_sale))
        .route("/birds/:id/purchase", put(io::purchase_bird))
        .route("/cages", get(io::list_cages).post(io::create_cage))
        .route("/cages/:id", put(io::update_cage).delete(io::delete_cage))
        .route("/nests", get(io::list_nests).post(io::create_nest))
        .route(
            "/nests/:id",
            get(io::get_nest).put(io::update_nest).delete(io::delete_nest),
        )
        .route("/pairs", get(io::list_pairs).post(io::propose_pair));

    Router::new()
        .nest("/api", api_routes)
        .fallback(io::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
