//! # Domain Models
//!
//! These structs represent the records the Grapevine backend owns.
//! Every identifier is minted by the server; the client never invents one.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier of a user, as returned by the user-lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The signed-in user, resolved from the session username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
}

/// Which dedicated endpoint mints a token.
///
/// The community `key` is not listed here: it is a short shareable token
/// with its own endpoint and response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    Post,
    CreatedPost,
    Community,
    Member,
}

impl IdentifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Post => "post",
            IdentifierKind::CreatedPost => "created_post",
            IdentifierKind::Community => "community",
            IdentifierKind::Member => "member",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two entity types minted through the creation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Post,
    Community,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Post => f.write_str("post"),
            EntityKind::Community => f.write_str("community"),
        }
    }
}

/// Selects which posts the listing endpoint returns (its `type` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedScope {
    /// The shared feed, with refresh and create controls.
    #[default]
    All,
    /// Only the posts the given user authored.
    User,
}

impl FeedScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedScope::All => "all",
            FeedScope::User => "user",
        }
    }
}

// ── Posts ────────────────────────────────────────────────────────────────────

/// A post as the client knows it.
///
/// Listing records carry `username` and `created_at`; a freshly built record
/// only has what was sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub post_id: String,
    pub description: String,
    /// Opaque URL string, never fetched or checked.
    pub image_link: String,
    pub author_user_id: Option<UserId>,
    pub username: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Post {
    /// The record the client persists for a new post.
    pub fn built(post_id: String, draft: &PostDraft, author: &UserId) -> Self {
        Self {
            post_id,
            description: draft.description.clone(),
            image_link: draft.image_link.clone(),
            author_user_id: Some(author.clone()),
            username: None,
            created_at: None,
        }
    }
}

/// User input for a new post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub description: String,
    pub image_link: String,
}

impl PostDraft {
    pub fn new(description: impl Into<String>, image_link: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            image_link: image_link.into(),
        }
    }
}

/// Associates a user with a post they authored. Listing goes through this link,
/// so a post without one is visible to nobody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedPostLink {
    pub link_id: String,
    pub user_id: UserId,
    pub post_id: String,
}

// ── Communities ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub community_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Shareable token used in URLs and key search. Distinct from `community_id`.
    pub key: String,
    pub owner_id: Option<UserId>,
    pub privacy: Option<String>,
}

impl Community {
    /// The record the client persists for a new community.
    pub fn built(community_id: String, key: String, draft: &CommunityDraft, owner: &UserId) -> Self {
        let description = draft.description.trim();
        Self {
            community_id,
            name: draft.name.clone(),
            description: (!description.is_empty()).then(|| draft.description.clone()),
            key,
            owner_id: Some(owner.clone()),
            privacy: None,
        }
    }

    /// Route of the community page.
    pub fn route(&self) -> String {
        format!("/communities/{}", self.key)
    }
}

/// User input for a new community. The description may be left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunityDraft {
    pub name: String,
    pub description: String,
}

impl CommunityDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Membership of a user in a community. The creator is auto-joined through one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberLink {
    pub member_id: String,
    pub user_id: UserId,
    pub community_id: String,
}
