//! # Remote Resource Gateway over reqwest
//!
//! One configured client: fixed base address, fixed request timeout, JSON in
//! both directions. No retries; every failure becomes a [`GatewayError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use domains::{
    Community, CreatedPostLink, FeedScope, GatewayError, IdentifierKind, MemberLink, Post,
    ResourceGateway, UserId,
};

use crate::wire::{
    CommunityRecord, CreatedPostBody, GeneratedId, GeneratedKey, LeaveRequest, MemberBody,
    NewCommunityBody, NewPostBody, PostListRequest, PostListResponse, PostRecord, SearchRequest,
    UserCommunitiesRequest, UserRecord,
};

/// Backend routes, relative to the base address.
pub mod routes {
    pub const POST_ID: &str = "api/getpostid/";
    pub const CREATED_POST_ID: &str = "api/getcreatedpostid/";
    pub const COMMUNITY_ID: &str = "api/getcommunitiesid/";
    pub const MEMBER_ID: &str = "api/getmemberid/";
    pub const COMMUNITY_KEY: &str = "api/getcommkey/";
    pub const POSTS: &str = "posts/";
    pub const CREATED_POSTS: &str = "createdposts/";
    pub const USER_POSTS: &str = "api/get_user_posts/";
    pub const CREATE_COMMUNITY: &str = "api/create_community/";
    pub const ADD_MEMBER: &str = "api/add_member/";
    pub const USER_COMMUNITIES: &str = "api/get_communities/";
    pub const SEARCH_COMMUNITIES: &str = "api/search_communities/";
    pub const LEAVE_COMMUNITY: &str = "api/leave-community";
    pub const COMMUNITY_DETAILS: &str = "api/community-details/";
    pub const USERS: &str = "users/";
}

fn identifier_route(kind: IdentifierKind) -> &'static str {
    match kind {
        IdentifierKind::Post => routes::POST_ID,
        IdentifierKind::CreatedPost => routes::CREATED_POST_ID,
        IdentifierKind::Community => routes::COMMUNITY_ID,
        IdentifierKind::Member => routes::MEMBER_ID,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayBuildError {
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid default header: {0}")]
    InvalidHeader(String),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

fn map_reqwest(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_decode() {
        GatewayError::Malformed(err.to_string())
    } else {
        GatewayError::Transport(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base: Url,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayBuildError> {
        // Relative routes only join under the base path when it ends with '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base = Url::parse(&normalized).map_err(|e| GatewayBuildError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let json = HeaderValue::from_str(mime::APPLICATION_JSON.as_ref())
            .map_err(|e| GatewayBuildError::InvalidHeader(e.to_string()))?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, json.clone());
        headers.insert(ACCEPT, json);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, route: &str) -> Result<Url, GatewayError> {
        self.base
            .join(route.trim_start_matches('/'))
            .map_err(|e| GatewayError::InvalidRequest(format!("bad route {route}: {e}")))
    }

    /// `route` followed by `segment` as one percent-encoded path segment.
    fn url_with_segment(&self, route: &str, segment: &str) -> Result<Url, GatewayError> {
        // Dot segments are normalized away by URL parsing, encoded or not.
        if segment.is_empty() || segment.chars().all(|c| c == '.') {
            return Err(GatewayError::InvalidRequest(format!(
                "{segment:?} is not a usable path segment"
            )));
        }
        let mut url = self.url(route)?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidRequest(format!("{route} cannot take segments")))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// Sends the request and turns non-2xx statuses into errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = request.send().await.map_err(map_reqwest)?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            tracing::debug!(status = status.as_u16(), "backend rejected request");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let bytes = response.bytes().await.map_err(map_reqwest)?;
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::Malformed(e.to_string()))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_json<T: DeserializeOwned>(&self, route: &str) -> Result<T, GatewayError> {
        self.get_json_at(self.url(route)?).await
    }

    async fn get_json_at<T: DeserializeOwned>(&self, url: Url) -> Result<T, GatewayError> {
        let response = self.send(self.client.get(url)).await?;
        Self::read_json(response).await
    }

    #[tracing::instrument(level = "debug", skip(self, body))]
    async fn post_json<B, T>(&self, route: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.client.post(self.url(route)?).json(body)).await?;
        Self::read_json(response).await
    }

    /// POST whose response body is irrelevant beyond its status.
    #[tracing::instrument(level = "debug", skip(self, body))]
    async fn post_unit<B>(&self, route: &str, body: &B) -> Result<(), GatewayError>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.send(self.client.post(self.url(route)?).json(body)).await?;
        Ok(())
    }

    /// POST that may echo the stored record. Anything that is not a record
    /// (empty body, an acknowledgement message) yields `None`.
    #[tracing::instrument(level = "debug", skip(self, body))]
    async fn post_echo<B, T>(&self, route: &str, body: &B) -> Result<Option<T>, GatewayError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.client.post(self.url(route)?).json(body)).await?;
        let bytes = response.bytes().await.map_err(map_reqwest)?;
        Ok(serde_json::from_slice(&bytes).ok())
    }
}

#[async_trait]
impl ResourceGateway for HttpGateway {
    async fn acquire_identifier(&self, kind: IdentifierKind) -> Result<String, GatewayError> {
        let minted: GeneratedId = self.get_json(identifier_route(kind)).await?;
        Ok(minted.gen_string)
    }

    async fn acquire_community_key(&self) -> Result<String, GatewayError> {
        let minted: GeneratedKey = self.get_json(routes::COMMUNITY_KEY).await?;
        Ok(minted.comm_key)
    }

    async fn create_post(&self, post: &Post) -> Result<Option<Post>, GatewayError> {
        let echoed: Option<PostRecord> = self
            .post_echo(routes::POSTS, &NewPostBody::from(post))
            .await?;
        Ok(echoed
            .filter(|record| record.postid.as_deref() == Some(post.post_id.as_str()))
            .map(|record| {
                let mut stored = Post::from(record);
                stored.author_user_id = stored.author_user_id.or_else(|| post.author_user_id.clone());
                stored
            }))
    }

    async fn link_created_post(&self, link: &CreatedPostLink) -> Result<(), GatewayError> {
        self.post_unit(routes::CREATED_POSTS, &CreatedPostBody::from(link))
            .await
    }

    async fn create_community(
        &self,
        community: &Community,
    ) -> Result<Option<Community>, GatewayError> {
        let echoed: Option<CommunityRecord> = self
            .post_echo(routes::CREATE_COMMUNITY, &NewCommunityBody::from(community))
            .await?;
        Ok(echoed
            .map(Community::from)
            .filter(|stored| stored.community_id == community.community_id)
            .map(|mut stored| {
                stored.owner_id = stored.owner_id.or_else(|| community.owner_id.clone());
                stored
            }))
    }

    async fn add_member(&self, link: &MemberLink) -> Result<(), GatewayError> {
        self.post_unit(routes::ADD_MEMBER, &MemberBody::from(link)).await
    }

    async fn leave_community(&self, user: &UserId, community_id: &str) -> Result<(), GatewayError> {
        let body = LeaveRequest {
            user: user.as_str(),
            community: community_id,
        };
        self.post_unit(routes::LEAVE_COMMUNITY, &body).await
    }

    async fn list_posts(&self, user: &UserId, scope: FeedScope) -> Result<Vec<Post>, GatewayError> {
        let body = PostListRequest {
            userid: user.as_str(),
            scope: scope.as_str(),
        };
        let listed: PostListResponse = self.post_json(routes::USER_POSTS, &body).await?;
        Ok(listed.posts.into_iter().map(Post::from).collect())
    }

    async fn list_communities(&self, user: &UserId) -> Result<Vec<Community>, GatewayError> {
        let body = UserCommunitiesRequest {
            userid: user.as_str(),
        };
        let listed: Vec<CommunityRecord> = self.post_json(routes::USER_COMMUNITIES, &body).await?;
        Ok(listed.into_iter().map(Community::from).collect())
    }

    async fn search_communities(&self, term: &str) -> Result<Vec<Community>, GatewayError> {
        let body = SearchRequest { search_term: term };
        let found: Vec<CommunityRecord> = self.post_json(routes::SEARCH_COMMUNITIES, &body).await?;
        Ok(found.into_iter().map(Community::from).collect())
    }

    async fn community_details(&self, key: &str) -> Result<Community, GatewayError> {
        let url = self.url_with_segment(routes::COMMUNITY_DETAILS, key)?;
        tracing::debug!(url = %url, "fetching community details");
        let record: CommunityRecord = self.get_json_at(url).await?;
        Ok(record.into())
    }

    async fn lookup_user(&self, username: &str) -> Result<Option<UserId>, GatewayError> {
        let request = self
            .client
            .get(self.url(routes::USERS)?)
            .query(&[("username", username)]);
        let response = self.send(request).await?;
        let users: Vec<UserRecord> = Self::read_json(response).await?;
        Ok(users.into_iter().next().map(|user| UserId(user.id)))
    }
}
