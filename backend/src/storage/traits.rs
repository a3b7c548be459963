//! # Storage Traits
//!
//! Storage abstractions used by the domain layer. Each registry talks to its
//! own trait, and a [`Connection`] hands out concrete repositories so services
//! can be built against any backend (SQLite in production and tests).

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::{bird::Bird, cage::Cage, nest::Nest, user::User};

/// Which slice of the bird collection a listing query returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BirdListing {
    /// Birds held by the owner or previously sold by them, excluding for-sale listings
    Holdings { owner_id: String },
    /// Marketplace: every bird listed for sale and not yet sold
    ForSale,
    /// Birds held by the owner that are neither listed nor sold
    Available { owner_id: String },
    /// Birds the user transferred to someone else (as seller) or sold to an external buyer
    Sold { owner_id: String },
    /// Unsold birds held by the owner, listed or not
    Unsold { owner_id: String },
}

/// Count and summed price of externally sold birds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SoldTotals {
    pub count: u32,
    pub total_price: f64,
}

#[async_trait]
pub trait BirdStorage: Send + Sync {
    /// Insert a new bird. Fails with [`UniqueViolation`](super::UniqueViolation) on a taken identifier.
    async fn store_bird(&self, bird: &Bird) -> Result<()>;

    async fn get_bird(&self, bird_id: &str) -> Result<Option<Bird>>;

    /// Fetch a bird only if it is held by `owner_id`
    async fn get_owned_bird(&self, bird_id: &str, owner_id: &str) -> Result<Option<Bird>>;

    async fn identifier_exists(&self, identifier: &str) -> Result<bool>;

    /// Overwrite every mutable column of an existing bird
    async fn update_bird(&self, bird: &Bird) -> Result<()>;

    /// Returns true if a row was deleted
    async fn delete_bird(&self, bird_id: &str) -> Result<bool>;

    /// Newest first
    async fn list_birds(&self, listing: &BirdListing) -> Result<Vec<Bird>>;

    async fn sold_totals(&self, owner_id: &str) -> Result<SoldTotals>;
}

#[async_trait]
pub trait CageStorage: Send + Sync {
    /// Insert a new cage. Fails with [`UniqueViolation`](super::UniqueViolation) on a taken cage number.
    async fn store_cage(&self, cage: &Cage) -> Result<()>;

    async fn get_cage(&self, cage_id: &str) -> Result<Option<Cage>>;

    /// Lookup across all owners, used for cage number uniqueness
    async fn find_cage_by_number(&self, cage_number: &str) -> Result<Option<Cage>>;

    async fn find_owned_cage_by_number(&self, cage_number: &str, owner_id: &str) -> Result<Option<Cage>>;

    async fn update_cage(&self, cage: &Cage) -> Result<()>;

    async fn delete_cage(&self, cage_id: &str) -> Result<bool>;

    /// Newest first
    async fn list_cages(&self, owner_id: &str) -> Result<Vec<Cage>>;

    /// Number of cages holding the bird as male or female
    async fn count_cages_for_bird(&self, bird_id: &str) -> Result<u32>;
}

#[async_trait]
pub trait NestStorage: Send + Sync {
    async fn store_nest(&self, nest: &Nest) -> Result<()>;

    /// The returned nest carries the live cage number of its cage
    async fn get_nest(&self, nest_id: &str) -> Result<Option<Nest>>;

    async fn update_nest(&self, nest: &Nest) -> Result<()>;

    async fn delete_nest(&self, nest_id: &str) -> Result<bool>;

    /// Newest first
    async fn list_nests(&self, owner_id: &str) -> Result<Vec<Nest>>;

    async fn count_nests_for_cage(&self, cage_id: &str) -> Result<u32>;
}

#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Insert a new user. Fails with [`UniqueViolation`](super::UniqueViolation) on a taken national id or email.
    async fn store_user(&self, user: &User) -> Result<()>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    async fn find_user_by_national_id(&self, national_id: &str) -> Result<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn store_session(&self, token: &str, user_id: &str) -> Result<()>;

    /// User id owning the session token, if any
    async fn find_session_user(&self, token: &str) -> Result<Option<String>>;
}

/// Factory for the repositories of one storage backend.
///
/// Services take an `Arc<C: Connection>` and build the repositories they need,
/// so swapping the backend never touches domain code.
pub trait Connection: Send + Sync + Clone + 'static {
    type BirdRepository: BirdStorage + Clone + 'static;
    type CageRepository: CageStorage + Clone + 'static;
    type NestRepository: NestStorage + Clone + 'static;
    type UserRepository: UserStorage + Clone + 'static;

    fn create_bird_repository(&self) -> Self::BirdRepository;

    fn create_cage_repository(&self) -> Self::CageRepository;

    fn create_nest_repository(&self) -> Self::NestRepository;

    fn create_user_repository(&self) -> Self::UserRepository;
}
