// Integration tests for the typed `UpstreamClient` endpoints using wiremock.
#![allow(clippy::unwrap_used)]

use bytes::Bytes;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kidsdiy_api::models::SignupRequest;
use kidsdiy_api::{BearerToken, Error, LoginCredentials, MediaFile, UpstreamClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, UpstreamClient) {
    let server = MockServer::start().await;
    let client =
        UpstreamClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap());
    (server, client)
}

fn token() -> BearerToken {
    BearerToken::new("T")
}

// ── Account ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_access_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .and(body_json(json!({ "username": "ada", "password": "secret1" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access": "A", "refresh": "R" })),
        )
        .mount(&server)
        .await;

    let creds = LoginCredentials::new("ada", SecretString::from("secret1"));
    let tokens = client.login(&creds).await.unwrap();

    assert_eq!(tokens.access, "A");
    assert_eq!(tokens.refresh.as_deref(), Some("R"));
}

#[tokio::test]
async fn test_login_rejection_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(
            json!({ "detail": "No active account found with the given credentials" }),
        ))
        .mount(&server)
        .await;

    let creds = LoginCredentials::new("ada", SecretString::from("wrong!"));
    let err = client.login(&creds).await.unwrap_err();

    assert!(matches!(err, Error::Authentication { .. }));
    assert!(err.is_auth_expired());
}

#[tokio::test]
async fn test_signup_posts_all_fields() {
    let (server, client) = setup().await;

    let request = SignupRequest {
        username: "ada".into(),
        email: "ada@example.test".into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        password: "secret1".into(),
    };

    Mock::given(method("POST"))
        .and(path("/api/account/signup/"))
        .and(body_json(serde_json::to_value(&request).unwrap()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 3 })))
        .expect(1)
        .mount(&server)
        .await;

    client.signup(&request).await.unwrap();
}

#[tokio::test]
async fn test_list_profiles_first_is_own() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/account/user-profile/"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 7, "username": "ada", "first_name": "Ada", "last_name": "Lovelace",
                "interests": ["Robotics"], "organization": "Makers", "role": null
            }
        ])))
        .mount(&server)
        .await;

    let profiles = client.list_profiles(Some(&token())).await.unwrap();

    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].id, 7);
    assert_eq!(profiles[0].interests, vec![json!("Robotics")]);
}

#[tokio::test]
async fn test_profile_record_and_lookups() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/account/user-profile/7/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "username": "ada", "interests": [1, 3], "organization": 2, "role": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/account/roles/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": 1, "name": "Student" }])),
        )
        .mount(&server)
        .await;

    let record = client.get_profile_record(7, Some(&token())).await.unwrap();
    let roles = client.list_roles(Some(&token())).await.unwrap();

    assert_eq!(record.interests, vec![1, 3]);
    assert_eq!(record.organization, Some(2));
    assert_eq!(roles[0].name, "Student");
}

// ── Feed, sessions, resources ───────────────────────────────────────

#[tokio::test]
async fn test_list_posts_and_sessions() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/posts/posts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1, "title": "Paper rocket", "content": "Fold it", "likes": 4,
            "images": ["/media/r.png"], "user": { "username": "ada" }
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/chat/sessions/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 2, "channel_name": "room-2", "start_time": "2026-10-18T10:00:00Z",
            "host": { "username": "bob", "first_name": "Bob", "last_name": "Builder" }
        }])))
        .mount(&server)
        .await;

    let posts = client.list_posts(Some(&token())).await.unwrap();
    let sessions = client.list_sessions(Some(&token())).await.unwrap();

    assert_eq!(posts[0].likes, 4);
    assert_eq!(posts[0].user.username, "ada");
    assert_eq!(sessions[0].channel_name, "room-2");
    assert!(!sessions[0].is_active);
}

#[tokio::test]
async fn test_get_resource_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/posts/resources/5/"))
        .respond_with(ResponseTemplate::new(404).set_body_string(""))
        .mount(&server)
        .await;

    let err = client.get_resource(5, Some(&token())).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.envelope_message(), "Failed to fetch resource");
}

// ── Media ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_media_returns_reference() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/posts/media/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "m-9" })))
        .mount(&server)
        .await;

    let file = MediaFile::image("a.jpg", "image/jpeg", Bytes::from_static(b"jpeg"));
    let uploaded = client.upload_media(vec![file], Some(&token())).await.unwrap();

    assert_eq!(uploaded.id.as_value(), &json!("m-9"));
}

#[tokio::test]
async fn test_upload_without_id_is_missing_reference() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/posts/media/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let file = MediaFile::image("a.jpg", "image/jpeg", Bytes::from_static(b"jpeg"));
    let err = client.upload_media(vec![file], None).await.unwrap_err();

    assert!(matches!(err, Error::MissingMediaReference));
}

#[tokio::test]
async fn test_media_file_from_path_guesses_mime() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("avatar.png");
    std::fs::write(&file_path, b"\x89PNG").unwrap();

    let file = MediaFile::from_path(&file_path).await.unwrap();

    assert_eq!(file.field, "images");
    assert_eq!(file.file_name, "avatar.png");
    assert_eq!(file.content_type, "image/png");
}
