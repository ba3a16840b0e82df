// ── Named backend endpoints ──
//
// Paths are normalized with a trailing slash; the backend redirects the
// slashless forms anyway.

use std::fmt;

/// Backend endpoints the client knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyEndpoint {
    Posts,
    Sessions,
    UserProfile,
    ProfileById(u64),
    Organizations,
    Roles,
    Interests,
    Resources,
    ResourceById(u64),
    Token,
    Signup,
    MediaUpload,
}

impl ProxyEndpoint {
    /// Upstream path relative to the base URL.
    pub fn path(self) -> String {
        match self {
            Self::Posts => "/api/posts/posts/".into(),
            Self::Sessions => "/api/chat/sessions/".into(),
            Self::UserProfile => "/api/account/user-profile/".into(),
            Self::ProfileById(id) => format!("/api/account/user-profile/{id}/"),
            Self::Organizations => "/api/account/organizations/".into(),
            Self::Roles => "/api/account/roles/".into(),
            Self::Interests => "/api/account/interests/".into(),
            Self::Resources => "/api/posts/resources/".into(),
            Self::ResourceById(id) => format!("/api/posts/resources/{id}/"),
            Self::Token => "/api/token/".into(),
            Self::Signup => "/api/account/signup/".into(),
            Self::MediaUpload => "/api/posts/media/".into(),
        }
    }

    /// Message reported when the backend fails without a `detail`.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Posts => "Failed to fetch posts",
            Self::Sessions => "Failed to fetch Sessions",
            Self::UserProfile | Self::ProfileById(_) => "Failed to fetch profile",
            Self::Organizations => "Failed to fetch organizations",
            Self::Roles => "Failed to fetch roles",
            Self::Interests => "Failed to fetch interests",
            Self::Resources => "Failed to fetch resources",
            Self::ResourceById(_) => "Failed to fetch resource",
            Self::Token => "Login failed",
            Self::Signup => "Registration Failed",
            Self::MediaUpload => "Failed to upload media",
        }
    }
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
