//! # Core Traits (Ports)
//!
//! Every collaborator the services talk to sits behind one of these traits.
//! The binary wires in concrete adapters; tests use the generated mocks.

use async_trait::async_trait;

use crate::errors::GatewayError;
use crate::models::{
    Community, CreatedPostLink, FeedScope, IdentifierKind, MemberLink, Post, UserId,
};

/// Every call to the Grapevine backend. No retries: failures propagate.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ResourceGateway: Send + Sync {
    // Identifier minting
    /// Requests one fresh server-minted token of the given kind.
    async fn acquire_identifier(&self, kind: IdentifierKind) -> Result<String, GatewayError>;
    /// Requests one fresh shareable community key.
    async fn acquire_community_key(&self) -> Result<String, GatewayError>;

    // Post writes
    /// Persists the post record. Returns the stored record if the backend echoes it.
    async fn create_post(&self, post: &Post) -> Result<Option<Post>, GatewayError>;
    async fn link_created_post(&self, link: &CreatedPostLink) -> Result<(), GatewayError>;

    // Community writes
    /// Persists the community record. Returns the stored record if the backend echoes it.
    async fn create_community(&self, community: &Community)
        -> Result<Option<Community>, GatewayError>;
    async fn add_member(&self, link: &MemberLink) -> Result<(), GatewayError>;
    /// Removes the membership link only; the community itself stays.
    async fn leave_community(&self, user: &UserId, community_id: &str)
        -> Result<(), GatewayError>;

    // Reads
    async fn list_posts(&self, user: &UserId, scope: FeedScope) -> Result<Vec<Post>, GatewayError>;
    async fn list_communities(&self, user: &UserId) -> Result<Vec<Community>, GatewayError>;
    async fn search_communities(&self, term: &str) -> Result<Vec<Community>, GatewayError>;
    async fn community_details(&self, key: &str) -> Result<Community, GatewayError>;
    /// Resolves a username to its user id; `None` when no user matches.
    async fn lookup_user(&self, username: &str) -> Result<Option<UserId>, GatewayError>;
}

/// Source of the signed-in username (browser storage, a config file, ...).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SessionProvider: Send + Sync {
    fn current_username(&self) -> Option<String>;
}

/// Routing collaborator called after a successful creation.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}
