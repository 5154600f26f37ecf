//! Exercises `HttpGateway` against a local mock backend.

use std::time::Duration;

use api_adapters::HttpGateway;
use domains::{
    Community, CreatedPostLink, FeedScope, GatewayError, IdentifierKind, Post, ResourceGateway,
    UserId,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer) -> HttpGateway {
    HttpGateway::new(&server.uri(), Duration::from_secs(5)).expect("valid base url")
}

fn draft_post() -> Post {
    Post {
        post_id: "P1".into(),
        description: "hello".into(),
        image_link: "http://x/y.png".into(),
        author_user_id: Some(UserId::from("7")),
        username: None,
        created_at: None,
    }
}

#[tokio::test]
async fn identifier_kinds_map_to_their_endpoints() {
    let server = MockServer::start().await;
    for (route, token) in [
        ("/api/getpostid/", "P1"),
        ("/api/getcreatedpostid/", "L1"),
        ("/api/getcommunitiesid/", "C1"),
        ("/api/getmemberid/", "M1"),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "genString": token })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let gw = gateway(&server);
    assert_eq!(gw.acquire_identifier(IdentifierKind::Post).await.unwrap(), "P1");
    assert_eq!(gw.acquire_identifier(IdentifierKind::CreatedPost).await.unwrap(), "L1");
    assert_eq!(gw.acquire_identifier(IdentifierKind::Community).await.unwrap(), "C1");
    assert_eq!(gw.acquire_identifier(IdentifierKind::Member).await.unwrap(), "M1");
}

#[tokio::test]
async fn community_key_reads_comm_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/getcommkey/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "commKey": "abcd" })))
        .mount(&server)
        .await;

    assert_eq!(gateway(&server).acquire_community_key().await.unwrap(), "abcd");
}

#[tokio::test]
async fn missing_token_field_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/getpostid/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "P1" })))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .acquire_identifier(IdentifierKind::Post)
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Malformed(_)));
}

#[tokio::test]
async fn post_write_sends_backend_body_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts/"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "postid": "P1",
            "postdescription": "hello",
            "imagelink": "http://x/y.png"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let echoed = gateway(&server).create_post(&draft_post()).await.unwrap();
    assert_eq!(echoed, None);
}

#[tokio::test]
async fn post_write_returns_echoed_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "postid": "P1",
            "postdescription": "hello",
            "imagelink": "http://x/y.png",
            "datetime": "2024-11-20T12:34:56Z"
        })))
        .mount(&server)
        .await;

    let echoed = gateway(&server)
        .create_post(&draft_post())
        .await
        .unwrap()
        .expect("echoed record");
    assert_eq!(echoed.post_id, "P1");
    assert!(echoed.created_at.is_some());
    assert_eq!(echoed.author_user_id, Some(UserId::from("7")));
}

#[tokio::test]
async fn created_post_link_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/createdposts/"))
        .and(body_json(json!({ "ucpid": "L1", "userid": "7", "postid": "P1" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let link = CreatedPostLink {
        link_id: "L1".into(),
        user_id: UserId::from("7"),
        post_id: "P1".into(),
    };
    gateway(&server).link_created_post(&link).await.unwrap();
}

#[tokio::test]
async fn community_write_and_member_link_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/create_community/"))
        .and(body_json(json!({
            "name": "Gardeners",
            "description": "",
            "user": "7",
            "communityid": "C1",
            "communitykey": "abcd"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/add_member/"))
        .and(body_json(json!({ "userid": "7", "communityid": "C1", "memberid": "M1" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let gw = gateway(&server);
    let community = Community {
        community_id: "C1".into(),
        name: "Gardeners".into(),
        description: None,
        key: "abcd".into(),
        owner_id: Some(UserId::from("7")),
        privacy: None,
    };
    assert_eq!(gw.create_community(&community).await.unwrap(), None);
    gw.add_member(&domains::MemberLink {
        member_id: "M1".into(),
        user_id: UserId::from("7"),
        community_id: "C1".into(),
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn listings_and_search() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/get_user_posts/"))
        .and(body_json(json!({ "userid": "7", "type": "all" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "posts": [{
                "postid": "P1",
                "username": "ana",
                "imagelink": "http://x/y.png",
                "description": "hello",
                "datetime": "2024-11-20T12:34:56Z"
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/get_communities/"))
        .and(body_json(json!({ "userid": "7" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "communityid": "C1", "communityname": "Gardeners", "communitykey": "abcd" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/search_communities/"))
        .and(body_json(json!({ "searchTerm": "gar" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let gw = gateway(&server);
    let user = UserId::from("7");

    let posts = gw.list_posts(&user, FeedScope::All).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].username.as_deref(), Some("ana"));

    let mine = gw.list_communities(&user).await.unwrap();
    assert_eq!(mine[0].key, "abcd");

    assert!(gw.search_communities("gar").await.unwrap().is_empty());
}

#[tokio::test]
async fn leave_and_details() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/leave-community"))
        .and(body_json(json!({ "user": "7", "community": "C1" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/community-details/abcd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "name": "Gardeners", "key": "abcd", "description": "Soil", "privacy": "public"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/community-details/none"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&server)
        .await;

    let gw = gateway(&server);
    gw.leave_community(&UserId::from("7"), "C1").await.unwrap();

    let details = gw.community_details("abcd").await.unwrap();
    assert_eq!(details.community_id, "1");
    assert_eq!(details.description.as_deref(), Some("Soil"));

    let err = gw.community_details("none").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn community_key_is_sent_as_one_encoded_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/community-details/ab%23cd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "C1", "name": "Gardeners", "key": "ab#cd"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/posts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "P1", "name": "not a community", "key": "x"
        })))
        .expect(0)
        .mount(&server)
        .await;

    let gw = gateway(&server);
    assert_eq!(gw.community_details("ab#cd").await.unwrap().community_id, "C1");
    for key in ["ab?x=1", "../../posts", "a/b"] {
        assert!(gw.community_details(key).await.unwrap_err().is_not_found());
    }

    let paths: Vec<String> = server
        .received_requests()
        .await
        .expect("request recording is on")
        .iter()
        .map(|request| request.url.path().to_string())
        .collect();
    assert_eq!(
        paths,
        [
            "/api/community-details/ab%23cd",
            "/api/community-details/ab%3Fx=1",
            "/api/community-details/..%2F..%2Fposts",
            "/api/community-details/a%2Fb",
        ]
    );
}

#[tokio::test]
async fn dot_key_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    let gw = gateway(&server);
    for key in ["..", "."] {
        let err = gw.community_details(key).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn user_lookup_uses_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/"))
        .and(query_param("username", "ana"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 42, "username": "ana" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/"))
        .and(query_param("username", "ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let gw = gateway(&server);
    assert_eq!(gw.lookup_user("ana").await.unwrap(), Some(UserId::from("42")));
    assert_eq!(gw.lookup_user("ghost").await.unwrap(), None);
}

#[tokio::test]
async fn error_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/createdposts/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let link = CreatedPostLink {
        link_id: "L1".into(),
        user_id: UserId::from("7"),
        post_id: "P1".into(),
    };
    let err = gateway(&server).link_created_post(&link).await.unwrap_err();
    assert_eq!(
        err,
        GatewayError::Status {
            status: 500,
            body: "boom".into()
        }
    );
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/getpostid/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "genString": "P1" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let gw = HttpGateway::new(&server.uri(), Duration::from_millis(100)).unwrap();
    let err = gw.acquire_identifier(IdentifierKind::Post).await.unwrap_err();
    assert_eq!(err, GatewayError::Timeout);
}
