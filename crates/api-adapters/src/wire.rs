//! JSON bodies exchanged with the Grapevine backend.
//!
//! Field names follow the backend exactly (`postid`, `ucpid`, `searchTerm`, ...).
//! Record identifiers arrive as strings or numbers depending on the endpoint,
//! so they are read leniently and kept as strings.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use domains::{Community, CreatedPostLink, MemberLink, Post, UserId};

// ── Identifier minting ───────────────────────────────────────────────────────

/// `GET /api/get*id/` response.
#[derive(Debug, Deserialize)]
pub struct GeneratedId {
    #[serde(rename = "genString")]
    pub gen_string: String,
}

/// `GET /api/getcommkey/` response. Older deployments answer with `genString`.
#[derive(Debug, Deserialize)]
pub struct GeneratedKey {
    #[serde(rename = "commKey", alias = "genString")]
    pub comm_key: String,
}

// ── Posts ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct NewPostBody<'a> {
    pub postid: &'a str,
    pub postdescription: &'a str,
    pub imagelink: &'a str,
}

impl<'a> From<&'a Post> for NewPostBody<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            postid: &post.post_id,
            postdescription: &post.description,
            imagelink: &post.image_link,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedPostBody<'a> {
    pub ucpid: &'a str,
    pub userid: &'a str,
    pub postid: &'a str,
}

impl<'a> From<&'a CreatedPostLink> for CreatedPostBody<'a> {
    fn from(link: &'a CreatedPostLink) -> Self {
        Self {
            ucpid: &link.link_id,
            userid: link.user_id.as_str(),
            postid: &link.post_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostListRequest<'a> {
    pub userid: &'a str,
    #[serde(rename = "type")]
    pub scope: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostRecord>,
}

/// A post as listed or echoed by the backend.
#[derive(Debug, Deserialize)]
pub struct PostRecord {
    #[serde(default, alias = "postId", deserialize_with = "lenient_id")]
    pub postid: Option<String>,
    #[serde(alias = "postdescription")]
    pub description: String,
    pub imagelink: String,
    #[serde(default, deserialize_with = "lenient_id")]
    pub userid: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub datetime: Option<DateTime<Utc>>,
}

impl From<PostRecord> for Post {
    fn from(record: PostRecord) -> Self {
        Post {
            post_id: record.postid.unwrap_or_default(),
            description: record.description,
            image_link: record.imagelink,
            author_user_id: record.userid.map(UserId),
            username: record.username,
            created_at: record.datetime,
        }
    }
}

// ── Communities ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct NewCommunityBody<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub user: Option<&'a str>,
    pub communityid: &'a str,
    pub communitykey: &'a str,
}

impl<'a> From<&'a Community> for NewCommunityBody<'a> {
    fn from(community: &'a Community) -> Self {
        Self {
            name: &community.name,
            description: community.description.as_deref().unwrap_or_default(),
            user: community.owner_id.as_ref().map(UserId::as_str),
            communityid: &community.community_id,
            communitykey: &community.key,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemberBody<'a> {
    pub userid: &'a str,
    pub communityid: &'a str,
    pub memberid: &'a str,
}

impl<'a> From<&'a MemberLink> for MemberBody<'a> {
    fn from(link: &'a MemberLink) -> Self {
        Self {
            userid: link.user_id.as_str(),
            communityid: &link.community_id,
            memberid: &link.member_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserCommunitiesRequest<'a> {
    pub userid: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    #[serde(rename = "searchTerm")]
    pub search_term: &'a str,
}

#[derive(Debug, Serialize)]
pub struct LeaveRequest<'a> {
    pub user: &'a str,
    pub community: &'a str,
}

/// A community as listed, searched, echoed or detailed by the backend.
#[derive(Debug, Deserialize)]
pub struct CommunityRecord {
    #[serde(alias = "id", deserialize_with = "required_id")]
    pub communityid: String,
    #[serde(alias = "name")]
    pub communityname: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(alias = "key")]
    pub communitykey: String,
    #[serde(default, alias = "ownerid", alias = "user", deserialize_with = "lenient_id")]
    pub owner: Option<String>,
    #[serde(default)]
    pub privacy: Option<String>,
}

impl From<CommunityRecord> for Community {
    fn from(record: CommunityRecord) -> Self {
        Community {
            community_id: record.communityid,
            name: record.communityname,
            description: record.description.filter(|d| !d.is_empty()),
            key: record.communitykey,
            owner_id: record.owner.map(UserId),
            privacy: record.privacy,
        }
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

/// One entry of `GET users/?username=`.
#[derive(Debug, Deserialize)]
pub struct UserRecord {
    #[serde(deserialize_with = "required_id")]
    pub id: String,
}

// ── Lenient field readers ────────────────────────────────────────────────────

fn id_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(id_from_value))
}

fn required_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    id_from_value(Value::deserialize(deserializer)?)
        .ok_or_else(|| serde::de::Error::custom("identifier must be a string or a number"))
}

fn timestamp_from_str(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Offset-less values are server time, which is UTC.
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Accepts RFC 3339, offset-less ISO 8601 and Unix seconds. Anything else is
/// dropped rather than failing the whole listing.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(raw)) => timestamp_from_str(raw.trim()),
        Some(Value::Number(secs)) => secs
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    })
}
