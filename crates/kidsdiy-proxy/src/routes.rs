// ── Proxy routes ──
//
// One handler per backend resource. Handlers only build a `ProxyRequest`;
// forwarding, reshaping and status mapping live in `ProxyRoute`.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use bytes::Bytes;
use kidsdiy_api::{
    MediaFile, ProxyBody, ProxyEndpoint, ProxyMethod, ProxyRequest, ProxyResponse, ProxyRoute,
    UPLOAD_FIELD,
};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::ProxyError;
use crate::extract::{Bearer, RecordId};

/// Upload size cap for `/proxy/media`.
const MEDIA_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub route: Arc<ProxyRoute>,
}

impl AppState {
    pub fn new(route: ProxyRoute) -> Self {
        Self {
            route: Arc::new(route),
        }
    }
}

/// Envelope plus status, written as `application/json`.
struct EnvelopeResponse(ProxyResponse);

impl IntoResponse for EnvelopeResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0.envelope)).into_response()
    }
}

/// Build the proxy router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health))
        .route("/proxy/posts", get(posts))
        .route("/proxy/sessions", get(sessions))
        .route("/proxy/user", get(user))
        .route("/proxy/user/{id}", get(user_by_id).patch(patch_user))
        .route("/proxy/organizations", get(organizations))
        .route("/proxy/roles", get(roles))
        .route("/proxy/interests", get(interests))
        .route("/proxy/resources", get(resources))
        .route("/proxy/resources/{id}", get(resource_by_id))
        .route(
            "/proxy/media",
            post(media).layer(DefaultBodyLimit::max(MEDIA_BODY_LIMIT)),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn forward(state: &AppState, request: ProxyRequest) -> EnvelopeResponse {
    EnvelopeResponse(state.route.forward(request).await)
}

async fn get_endpoint(state: &AppState, bearer: Bearer, endpoint: ProxyEndpoint) -> EnvelopeResponse {
    let request = ProxyRequest::endpoint(ProxyMethod::Get, endpoint).with_token(bearer.0);
    forward(state, request).await
}

// ── Handlers ────────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn posts(State(state): State<AppState>, bearer: Bearer) -> EnvelopeResponse {
    get_endpoint(&state, bearer, ProxyEndpoint::Posts).await
}

async fn sessions(State(state): State<AppState>, bearer: Bearer) -> EnvelopeResponse {
    get_endpoint(&state, bearer, ProxyEndpoint::Sessions).await
}

async fn user(State(state): State<AppState>, bearer: Bearer) -> EnvelopeResponse {
    get_endpoint(&state, bearer, ProxyEndpoint::UserProfile).await
}

async fn user_by_id(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    bearer: Bearer,
) -> EnvelopeResponse {
    get_endpoint(&state, bearer, ProxyEndpoint::ProfileById(id)).await
}

async fn patch_user(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    bearer: Bearer,
    body: Bytes,
) -> Result<EnvelopeResponse, ProxyError> {
    let body: Value =
        serde_json::from_slice(&body).map_err(|e| ProxyError::MalformedJson(e.to_string()))?;
    let request = ProxyRequest::endpoint(ProxyMethod::Patch, ProxyEndpoint::ProfileById(id))
        .with_body(ProxyBody::Json(body))
        .with_token(bearer.0);
    Ok(forward(&state, request).await)
}

async fn organizations(State(state): State<AppState>, bearer: Bearer) -> EnvelopeResponse {
    get_endpoint(&state, bearer, ProxyEndpoint::Organizations).await
}

async fn roles(State(state): State<AppState>, bearer: Bearer) -> EnvelopeResponse {
    get_endpoint(&state, bearer, ProxyEndpoint::Roles).await
}

async fn interests(State(state): State<AppState>, bearer: Bearer) -> EnvelopeResponse {
    get_endpoint(&state, bearer, ProxyEndpoint::Interests).await
}

async fn resources(State(state): State<AppState>, bearer: Bearer) -> EnvelopeResponse {
    get_endpoint(&state, bearer, ProxyEndpoint::Resources).await
}

async fn resource_by_id(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    bearer: Bearer,
) -> EnvelopeResponse {
    get_endpoint(&state, bearer, ProxyEndpoint::ResourceById(id)).await
}

/// Re-encode the inbound multipart file parts and forward them.
async fn media(
    State(state): State<AppState>,
    bearer: Bearer,
    mut multipart: Multipart,
) -> Result<EnvelopeResponse, ProxyError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ProxyError::MalformedMultipart(e.to_string()))?
    {
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let name = field.name().unwrap_or(UPLOAD_FIELD).to_owned();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ProxyError::MalformedMultipart(e.to_string()))?;

        debug!(%name, %file_name, size = bytes.len(), "received upload part");
        files.push(MediaFile {
            field: name,
            file_name,
            content_type,
            bytes,
        });
    }

    if files.is_empty() {
        return Err(ProxyError::EmptyUpload);
    }

    let request = ProxyRequest::endpoint(ProxyMethod::Post, ProxyEndpoint::MediaUpload)
        .with_body(ProxyBody::Multipart(files))
        .with_token(bearer.0);
    Ok(forward(&state, request).await)
}
