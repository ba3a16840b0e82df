// ── Credential provider ──
//
// The bearer token is an explicit dependency: controllers and the proxy
// ask a `CredentialProvider` for it on every call. The persisted form is
// the `accessToken` cookie, stored as JSON in the platform data dir.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, TimeDelta, Utc};
use kidsdiy_api::BearerToken;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CoreError;

/// Cookie name the web client uses for the access token.
pub const ACCESS_COOKIE: &str = "accessToken";

/// Source of the bearer credential attached to outbound calls.
pub trait CredentialProvider: Send + Sync {
    /// The current token, or `None` when the user is signed out.
    fn bearer(&self) -> Option<BearerToken>;
}

/// A fixed token (or none), e.g. from a `--token` flag.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(Option<BearerToken>);

impl StaticCredential {
    pub fn new(token: Option<BearerToken>) -> Self {
        Self(token)
    }
}

impl CredentialProvider for StaticCredential {
    fn bearer(&self) -> Option<BearerToken> {
        self.0.clone()
    }
}

// ── Access cookie ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

/// The persisted access-token cookie.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCookie {
    pub name: String,
    pub value: String,
    pub expires_at: DateTime<Utc>,
    pub path: String,
    pub same_site: SameSite,
    pub secure: bool,
}

impl AccessCookie {
    /// Cookie lifetime after login.
    pub fn lifetime() -> TimeDelta {
        TimeDelta::days(1)
    }

    /// A fresh cookie for `token`, valid for one day from `now`.
    pub fn issue(token: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: ACCESS_COOKIE.into(),
            value: token.into(),
            expires_at: now + Self::lifetime(),
            path: "/".into(),
            same_site: SameSite::Lax,
            secure: false,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Debug for AccessCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCookie")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("path", &self.path)
            .field("same_site", &self.same_site)
            .field("secure", &self.secure)
            .finish()
    }
}

// ── Cookie store ────────────────────────────────────────────────────

/// Process-wide credential: written at login, read by every call.
///
/// Backed by a file when given a path; `in_memory` stores keep the cookie
/// for the life of the process only.
#[derive(Debug, Default)]
pub struct CookieCredentialStore {
    cookie: ArcSwapOption<AccessCookie>,
    path: Option<PathBuf>,
}

impl CookieCredentialStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store, loading any cookie already saved there.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let cookie = read_cookie(&path)?;
        debug!(path = %path.display(), present = cookie.is_some(), "opened credential store");
        Ok(Self {
            cookie: ArcSwapOption::new(cookie.map(Arc::new)),
            path: Some(path),
        })
    }

    /// The stored cookie, expired or not.
    pub fn cookie(&self) -> Option<Arc<AccessCookie>> {
        self.cookie.load_full()
    }

    /// Store a freshly issued token and persist it.
    pub fn store(&self, token: &str) -> Result<AccessCookie, CoreError> {
        let cookie = AccessCookie::issue(token, Utc::now());
        if let Some(path) = &self.path {
            write_cookie(path, &cookie)?;
        }
        self.cookie.store(Some(Arc::new(cookie.clone())));
        info!(expires_at = %cookie.expires_at, "access token stored");
        Ok(cookie)
    }

    /// Forget the token, removing the persisted cookie.
    pub fn clear(&self) -> Result<(), CoreError> {
        self.cookie.store(None);
        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(storage_error(path, &e)),
            }
        }
        info!("access token cleared");
        Ok(())
    }
}

impl CredentialProvider for CookieCredentialStore {
    fn bearer(&self) -> Option<BearerToken> {
        let cookie = self.cookie.load();
        let cookie = cookie.as_ref()?;
        if cookie.is_expired(Utc::now()) {
            debug!("stored access token has expired");
            return None;
        }
        Some(BearerToken::new(cookie.value.clone()))
    }
}

fn read_cookie(path: &Path) -> Result<Option<AccessCookie>, CoreError> {
    match std::fs::read(path) {
        Ok(raw) => serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|e| CoreError::Storage {
                message: format!("{}: {e}", path.display()),
            }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(storage_error(path, &e)),
    }
}

fn write_cookie(path: &Path, cookie: &AccessCookie) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| storage_error(parent, &e))?;
    }
    let raw = serde_json::to_vec_pretty(cookie).map_err(|e| CoreError::Storage {
        message: e.to_string(),
    })?;

    // Owner-only before the token lands at its final path.
    let temp = path.with_extension("tmp");
    std::fs::write(&temp, raw).map_err(|e| storage_error(&temp, &e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&temp)
            .map_err(|e| storage_error(&temp, &e))?
            .permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(&temp, perms).map_err(|e| storage_error(&temp, &e))?;
    }
    std::fs::rename(&temp, path).map_err(|e| storage_error(path, &e))
}

fn storage_error(path: &Path, err: &std::io::Error) -> CoreError {
    CoreError::Storage {
        message: format!("{}: {err}", path.display()),
    }
}
