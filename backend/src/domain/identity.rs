use async_trait::async_trait;

use super::error::DomainResult;

/// Resolves a bearer token into the id of the calling user
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `None` when the token is unknown
    async fn resolve(&self, token: &str) -> DomainResult<Option<String>>;
}
