use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `kidsdiy-api` crate.
///
/// Every failure an upstream call can produce: non-2xx answers from the
/// backend, transport failures, undecodable bodies and local I/O while
/// preparing uploads. `kidsdiy-core` maps these into page-level errors,
/// and [`ProxyRoute`](crate::ProxyRoute) flattens them into an envelope.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token endpoint rejected the credentials.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Upstream ────────────────────────────────────────────────────
    /// Non-2xx answer from the backend. `message` is the backend's
    /// `detail` field when it sent one, otherwise the caller's fallback.
    #[error("Upstream error (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request exceeded the configured bound.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or client construction failure.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Upload answered 2xx but carried no usable `id`.
    #[error("upload response did not include a media id")]
    MissingMediaReference,

    /// Reading a local file for upload failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if the backend refused the bearer credential.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::Upstream { status: 401 | 403, .. }
        )
    }

    /// Returns `true` if this is a transient error worth a user-initiated retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the backend answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Upstream { status: 404, .. })
    }

    /// HTTP status reported by the backend, if the call got that far.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The single-line message placed in an `{error}` envelope.
    ///
    /// Upstream failures surface the backend's own wording verbatim so a
    /// page can render `Error: Not authenticated` unchanged.
    pub fn envelope_message(&self) -> String {
        match self {
            Self::Upstream { message, .. } | Self::Authentication { message } => message.clone(),
            Self::Timeout { .. } => "request timed out".into(),
            other => other.to_string(),
        }
    }
}
