//! Post and community specializations of the creation pipeline.

use async_trait::async_trait;

use domains::validation::{validate_community, validate_post};
use domains::{
    Community, CommunityDraft, CreatedPostLink, EntityKind, FeedScope, GatewayError,
    IdentifierKind, MemberLink, Post, PostDraft, ResourceGateway, UserId, ValidationError,
};

use crate::identifiers::IdentifierSource;
use crate::pipeline::{EntityRecipe, ResyncPolicy};

/// Post then `CreatedPost` link. Resyncs from the backend after creation.
#[derive(Debug, Clone)]
pub struct PostRecipe {
    scope: FeedScope,
    resync: ResyncPolicy,
}

impl PostRecipe {
    pub fn new(scope: FeedScope) -> Self {
        Self {
            scope,
            resync: ResyncPolicy::Refetch,
        }
    }

    pub fn with_resync(mut self, resync: ResyncPolicy) -> Self {
        self.resync = resync;
        self
    }

    pub fn scope(&self) -> FeedScope {
        self.scope
    }
}

#[async_trait]
impl EntityRecipe for PostRecipe {
    type Draft = PostDraft;
    type Extras = ();
    type Entity = Post;
    type Link = CreatedPostLink;

    const KIND: EntityKind = EntityKind::Post;
    const PRIMARY_ID: IdentifierKind = IdentifierKind::Post;
    const LINK_ID: IdentifierKind = IdentifierKind::CreatedPost;
    const EXTRA_IDENTIFIERS: bool = false;

    fn validate(&self, draft: &PostDraft) -> Result<(), ValidationError> {
        validate_post(draft)
    }

    async fn acquire_extras(&self, _ids: &IdentifierSource) -> Result<(), GatewayError> {
        Ok(())
    }

    fn build_entity(&self, post_id: String, _: (), draft: &PostDraft, owner: &UserId) -> Post {
        Post::built(post_id, draft, owner)
    }

    async fn write_entity(
        &self,
        gateway: &dyn ResourceGateway,
        post: &Post,
    ) -> Result<Option<Post>, GatewayError> {
        gateway.create_post(post).await
    }

    fn build_link(&self, link_id: String, owner: &UserId, post: &Post) -> CreatedPostLink {
        CreatedPostLink {
            link_id,
            user_id: owner.clone(),
            post_id: post.post_id.clone(),
        }
    }

    async fn write_link(
        &self,
        gateway: &dyn ResourceGateway,
        link: &CreatedPostLink,
    ) -> Result<(), GatewayError> {
        gateway.link_created_post(link).await
    }

    async fn refetch(
        &self,
        gateway: &dyn ResourceGateway,
        owner: &UserId,
    ) -> Result<Vec<Post>, GatewayError> {
        gateway.list_posts(owner, self.scope).await
    }

    fn resync(&self) -> ResyncPolicy {
        self.resync
    }
}

/// Community (with its shareable key) then the creator's `Member` link.
/// Trusts the merged record instead of refetching, and redirects to the
/// community page.
#[derive(Debug, Clone)]
pub struct CommunityRecipe {
    resync: ResyncPolicy,
}

impl Default for CommunityRecipe {
    fn default() -> Self {
        Self {
            resync: ResyncPolicy::TrustLocal,
        }
    }
}

impl CommunityRecipe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resync(mut self, resync: ResyncPolicy) -> Self {
        self.resync = resync;
        self
    }
}

#[async_trait]
impl EntityRecipe for CommunityRecipe {
    type Draft = CommunityDraft;
    /// The community key.
    type Extras = String;
    type Entity = Community;
    type Link = MemberLink;

    const KIND: EntityKind = EntityKind::Community;
    const PRIMARY_ID: IdentifierKind = IdentifierKind::Community;
    const LINK_ID: IdentifierKind = IdentifierKind::Member;
    const EXTRA_IDENTIFIERS: bool = true;

    fn validate(&self, draft: &CommunityDraft) -> Result<(), ValidationError> {
        validate_community(draft)
    }

    async fn acquire_extras(&self, ids: &IdentifierSource) -> Result<String, GatewayError> {
        ids.acquire_community_key().await
    }

    fn build_entity(
        &self,
        community_id: String,
        key: String,
        draft: &CommunityDraft,
        owner: &UserId,
    ) -> Community {
        Community::built(community_id, key, draft, owner)
    }

    async fn write_entity(
        &self,
        gateway: &dyn ResourceGateway,
        community: &Community,
    ) -> Result<Option<Community>, GatewayError> {
        gateway.create_community(community).await
    }

    fn build_link(&self, member_id: String, owner: &UserId, community: &Community) -> MemberLink {
        MemberLink {
            member_id,
            user_id: owner.clone(),
            community_id: community.community_id.clone(),
        }
    }

    async fn write_link(
        &self,
        gateway: &dyn ResourceGateway,
        link: &MemberLink,
    ) -> Result<(), GatewayError> {
        gateway.add_member(link).await
    }

    async fn refetch(
        &self,
        gateway: &dyn ResourceGateway,
        owner: &UserId,
    ) -> Result<Vec<Community>, GatewayError> {
        gateway.list_communities(owner).await
    }

    fn resync(&self) -> ResyncPolicy {
        self.resync
    }

    fn redirect(&self, community: &Community) -> Option<String> {
        Some(community.route())
    }
}
