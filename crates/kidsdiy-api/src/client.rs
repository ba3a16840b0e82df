// Upstream HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer auth, JSON and
// multipart bodies, and `detail`-aware error parsing. Typed endpoint
// methods live in sibling modules (account, posts, chat, media) as
// inherent impls; the proxy route uses `execute` directly.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::auth::BearerToken;
use crate::endpoints::ProxyEndpoint;
use crate::error::Error;
use crate::request::{MediaFile, ProxyBody, ProxyMethod, ProxyRequest};
use crate::transport::TransportConfig;

/// Error body shape returned by the backend on non-2xx answers.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// Raw HTTP client for the platform backend.
///
/// Stateless across calls: the bearer token travels with each request
/// rather than living on the client.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl UpstreamClient {
    /// Create a client from a base URL and transport settings.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append a path to the base URL, keeping any path prefix the base has.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Generic execution (proxy path) ───────────────────────────────

    /// Perform the call and return the parsed 2xx body.
    ///
    /// An empty 2xx body becomes `Value::Null`. Non-2xx answers become
    /// [`Error::Upstream`] with the backend's `detail` or `fallback`.
    pub async fn execute(&self, request: &ProxyRequest, fallback: &str) -> Result<Value, Error> {
        let resp = self
            .send(
                request.method,
                &request.path,
                &request.body,
                request.token.as_ref(),
            )
            .await?;
        self.handle_response(resp, fallback).await
    }

    // ── Typed helpers (endpoint modules) ─────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        endpoint: ProxyEndpoint,
        token: Option<&BearerToken>,
    ) -> Result<T, Error> {
        let resp = self
            .send(ProxyMethod::Get, &endpoint.path(), &ProxyBody::Empty, token)
            .await?;
        self.handle_response(resp, endpoint.failure_message()).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        endpoint: ProxyEndpoint,
        body: &B,
        token: Option<&BearerToken>,
    ) -> Result<T, Error> {
        let body = ProxyBody::Json(self.to_json(body)?);
        let resp = self
            .send(ProxyMethod::Post, &endpoint.path(), &body, token)
            .await?;
        self.handle_response(resp, endpoint.failure_message()).await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        endpoint: ProxyEndpoint,
        body: &B,
        token: Option<&BearerToken>,
    ) -> Result<T, Error> {
        let body = ProxyBody::Json(self.to_json(body)?);
        let resp = self
            .send(ProxyMethod::Patch, &endpoint.path(), &body, token)
            .await?;
        self.handle_response(resp, endpoint.failure_message()).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        endpoint: ProxyEndpoint,
        files: Vec<MediaFile>,
        token: Option<&BearerToken>,
    ) -> Result<T, Error> {
        let body = ProxyBody::Multipart(files);
        let resp = self
            .send(ProxyMethod::Post, &endpoint.path(), &body, token)
            .await?;
        self.handle_response(resp, endpoint.failure_message()).await
    }

    // ── Transport ────────────────────────────────────────────────────

    async fn send(
        &self,
        method: ProxyMethod,
        path: &str,
        body: &ProxyBody,
        token: Option<&BearerToken>,
    ) -> Result<reqwest::Response, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method.into(), url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token.expose());
        }

        builder = match body {
            // The backend expects a JSON content type even on bodiless GETs.
            ProxyBody::Empty => builder.header(reqwest::header::CONTENT_TYPE, "application/json"),
            ProxyBody::Json(value) => builder.json(value),
            ProxyBody::Multipart(files) => builder.multipart(build_form(files)?),
        };

        builder.send().await.map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }

    fn to_json<B: Serialize>(&self, body: &B) -> Result<Value, Error> {
        serde_json::to_value(body).map_err(|e| Error::Deserialization {
            message: format!("failed to encode request body: {e}"),
            body: String::new(),
        })
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        fallback: &str,
    ) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(status, resp, fallback).await);
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        let raw = if body.trim().is_empty() { "null" } else { body.as_str() };
        trace!(bytes = body.len(), "upstream body received");

        serde_json::from_str(raw).map_err(|e| {
            let preview = body
                .char_indices()
                .nth(200)
                .map_or(body.as_str(), |(end, _)| &body[..end]);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Non-2xx: prefer the backend's `detail`; unparseable bodies fall
    /// back to the caller's message instead of surfacing a parse error.
    async fn parse_error(
        &self,
        status: reqwest::StatusCode,
        resp: reqwest::Response,
        fallback: &str,
    ) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .ok()
            .and_then(|b| b.detail)
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| fallback.to_owned());

        debug!(status = status.as_u16(), %message, "upstream call failed");
        Error::Upstream {
            status: status.as_u16(),
            message,
        }
    }
}

fn build_form(files: &[MediaFile]) -> Result<Form, Error> {
    let mut form = Form::new();
    for file in files {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        form = form.part(file.field.clone(), part);
    }
    Ok(form)
}
