// Router tests: requests go through the axum router into a wiremock backend.
#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kidsdiy_api::{ProxyRoute, StatusPolicy, TransportConfig, UpstreamClient};
use kidsdiy_proxy::{AppState, router};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(policy: StatusPolicy) -> (MockServer, Router) {
    let server = MockServer::start().await;
    let client = UpstreamClient::new(
        Url::parse(&server.uri()).unwrap(),
        &TransportConfig::default(),
    )
    .unwrap();
    let app = router(AppState::new(ProxyRoute::new(client, policy)));
    (server, app)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_posts_success_is_data_envelope() {
    let (server, app) = setup(StatusPolicy::Collapse).await;
    let posts = json!([{ "id": 1, "title": "Paper rocket" }]);

    Mock::given(method("GET"))
        .and(path("/api/posts/posts/"))
        .and(header("authorization", "Bearer tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&posts))
        .mount(&server)
        .await;

    let (status, body) = send(app, get("/proxy/posts", Some("tok123"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": posts, "error": null }));
}

#[tokio::test]
async fn test_expired_token_collapses_to_500() {
    let (server, app) = setup(StatusPolicy::Collapse).await;

    Mock::given(method("GET"))
        .and(path("/api/posts/posts/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Not authenticated" })),
        )
        .mount(&server)
        .await;

    let (status, body) = send(app, get("/proxy/posts", Some("expired"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "data": null, "error": "Not authenticated" }));
}

#[tokio::test]
async fn test_sessions_fallback_message() {
    let (server, app) = setup(StatusPolicy::Collapse).await;

    Mock::given(method("GET"))
        .and(path("/api/chat/sessions/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let (status, body) = send(app, get("/proxy/sessions", None)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch Sessions");
}

#[tokio::test]
async fn test_missing_header_forwards_without_authorization() {
    let (server, app) = setup(StatusPolicy::Collapse).await;

    Mock::given(method("GET"))
        .and(path("/api/account/user-profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (status, _) = send(app, get("/proxy/user", None)).await;
    assert_eq!(status, StatusCode::OK);

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_preserve_policy_keeps_404() {
    let (server, app) = setup(StatusPolicy::Preserve).await;

    Mock::given(method("GET"))
        .and(path("/api/posts/resources/3/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not found." })))
        .mount(&server)
        .await;

    let (status, body) = send(app, get("/proxy/resources/3", Some("t"))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found.");
}

#[tokio::test]
async fn test_patch_user_forwards_json_body() {
    let (server, app) = setup(StatusPolicy::Collapse).await;

    Mock::given(method("PATCH"))
        .and(path("/api/account/user-profile/7/"))
        .and(body_json(json!({ "biography": "Tinkerer" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::builder()
        .method("PATCH")
        .uri("/proxy/user/7")
        .header("authorization", "Bearer t")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"biography":"Tinkerer"}"#))
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "id": 7 }));
}

#[tokio::test]
async fn test_malformed_patch_body_is_rejected_locally() {
    let (server, app) = setup(StatusPolicy::Collapse).await;

    let request = Request::builder()
        .method("PATCH")
        .uri("/proxy/user/7")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"].is_null());
    assert!(body["error"].as_str().unwrap().starts_with("request body is not valid JSON"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_numeric_id_is_an_error_envelope() {
    let (server, app) = setup(StatusPolicy::Collapse).await;

    let (status, body) = send(app.clone(), get("/proxy/resources/abc", Some("t"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"].is_null());
    assert!(body["error"].as_str().unwrap().starts_with("invalid id"));

    let request = Request::builder()
        .method("PATCH")
        .uri("/proxy/user/me")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_media_upload_is_forwarded_as_multipart() {
    let (server, app) = setup(StatusPolicy::Collapse).await;

    Mock::given(method("POST"))
        .and(path("/api/posts/media/"))
        .and(body_string_contains("name=\"images\""))
        .and(body_string_contains("filename=\"me.png\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 42 })))
        .expect(1)
        .mount(&server)
        .await;

    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"images\"; filename=\"me.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         PNGDATA\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/proxy/media")
        .header("authorization", "Bearer t")
        .header("content-type", format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "id": 42 }));
}

#[tokio::test]
async fn test_health() {
    let (_server, app) = setup(StatusPolicy::Collapse).await;
    let (status, body) = send(app, get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
