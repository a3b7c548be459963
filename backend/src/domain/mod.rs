//! # Domain Module
//!
//! Business rules of the breeding farm. Each registry is a service generic over
//! a storage [`Connection`](crate::storage::Connection) and validates, checks
//! ownership and logs before delegating to the storage traits.
//!
//! - [`bird_service`]: birds and the sale/transfer operations
//! - [`cage_service`]: breeding cages holding one male and one female
//! - [`nest_service`]: clutches recorded against a cage
//! - [`pairs_service`]: computed pairing view, never persisted
//! - [`user_service`]: registration and bearer sessions
//! - [`transfer`]: the pure sale state machine

pub mod bird_service;
pub mod cage_service;
pub mod commands;
pub mod error;
pub mod identity;
pub mod models;
pub mod nest_service;
pub mod pairs_service;
pub mod transfer;
pub mod user_service;
pub mod validation;

pub use bird_service::BirdService;
pub use cage_service::CageService;
pub use error::{DomainError, DomainResult};
pub use identity::IdentityProvider;
pub use nest_service::NestService;
pub use pairs_service::PairsService;
pub use user_service::UserService;
