use std::net::SocketAddr;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kidsdiy_api::Envelope;
use serde_json::Value;
use thiserror::Error;

/// Request rejected before anything was forwarded.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("request body is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("invalid multipart body: {0}")]
    MalformedMultipart(String),

    #[error("no files in upload")]
    EmptyUpload,

    #[error("invalid id: {0}")]
    InvalidId(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let envelope: Envelope<Value> = Envelope::Error(self.to_string());
        (StatusCode::BAD_REQUEST, Json(envelope)).into_response()
    }
}

/// Failure to start or run the proxy server.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
