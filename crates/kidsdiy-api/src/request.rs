// ── Outbound request description ──
//
// A `ProxyRequest` is everything the proxy needs to reproduce a call
// against the backend: verb, path, body and the optional bearer token.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use bytes::Bytes;
use serde_json::Value;

use crate::auth::BearerToken;
use crate::endpoints::ProxyEndpoint;
use crate::error::Error;

/// Multipart field name the backend expects for uploaded media.
pub const UPLOAD_FIELD: &str = "images";

/// HTTP verbs the proxy forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyMethod {
    Get,
    Post,
    Patch,
}

impl ProxyMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
        }
    }
}

impl From<ProxyMethod> for reqwest::Method {
    fn from(method: ProxyMethod) -> Self {
        match method {
            ProxyMethod::Get => Self::GET,
            ProxyMethod::Post => Self::POST,
            ProxyMethod::Patch => Self::PATCH,
        }
    }
}

impl fmt::Display for ProxyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl MediaFile {
    /// An image part under the backend's `images` field.
    pub fn image(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            field: UPLOAD_FIELD.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a local file into an `images` part, guessing its MIME type
    /// from the extension.
    pub async fn from_path(path: &Path) -> Result<Self, Error> {
        let bytes = tokio::fs::read(path).await.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_owned(), |n| n.to_string_lossy().into_owned());
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_owned();
        Ok(Self::image(file_name, content_type, Bytes::from(bytes)))
    }
}

/// Request body variants: nothing, JSON, or a multipart file set.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ProxyBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(Vec<MediaFile>),
}

/// A single call to forward upstream.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: ProxyMethod,
    /// Path relative to the configured base URL, starting with `/`.
    pub path: String,
    pub body: ProxyBody,
    pub token: Option<BearerToken>,
    /// Message used when the backend fails without a `detail` field.
    pub fallback: Option<Cow<'static, str>>,
}

impl ProxyRequest {
    pub fn new(method: ProxyMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: ProxyBody::Empty,
            token: None,
            fallback: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(ProxyMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(ProxyMethod::Post, path).with_body(ProxyBody::Json(body))
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(ProxyMethod::Patch, path).with_body(ProxyBody::Json(body))
    }

    pub fn upload(path: impl Into<String>, files: Vec<MediaFile>) -> Self {
        Self::new(ProxyMethod::Post, path).with_body(ProxyBody::Multipart(files))
    }

    /// A request against a named endpoint, carrying its failure message.
    pub fn endpoint(method: ProxyMethod, endpoint: ProxyEndpoint) -> Self {
        Self::new(method, endpoint.path()).with_fallback(endpoint.failure_message())
    }

    #[must_use]
    pub fn with_body(mut self, body: ProxyBody) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<BearerToken>) -> Self {
        self.token = token;
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.fallback = Some(message.into());
        self
    }
}
