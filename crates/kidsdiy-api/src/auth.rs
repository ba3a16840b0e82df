use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

/// Bearer credential authenticating a user to the backend.
///
/// Wraps the access token in a [`SecretString`] so it never lands in
/// debug output or logs.
#[derive(Debug, Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Parse an inbound `Authorization` header value.
    ///
    /// Accepts `Bearer <token>` (scheme matched case-insensitively).
    /// Returns `None` for other schemes, a missing token, or the literal
    /// strings `null` / `undefined` that browser clients send when no
    /// cookie is present.
    pub fn from_authorization(value: &str) -> Option<Self> {
        let (scheme, token) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        let token = token.trim();
        if token.is_empty() || token == "null" || token == "undefined" {
            return None;
        }
        Some(Self::new(token))
    }

    /// The raw token string.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<SecretString> for BearerToken {
    fn from(secret: SecretString) -> Self {
        Self(secret)
    }
}

/// Username/password pair posted to the token endpoint.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub username: String,
    pub password: SecretString,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Wire body for `POST /api/token/`.
    pub fn to_body(&self) -> serde_json::Value {
        #[derive(Serialize)]
        struct TokenRequest<'a> {
            username: &'a str,
            password: &'a str,
        }

        serde_json::json!(TokenRequest {
            username: &self.username,
            password: self.password.expose_secret(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bearer_header() {
        let token = BearerToken::from_authorization("Bearer tok123");
        assert_eq!(token.as_ref().map(BearerToken::expose), Some("tok123"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert!(BearerToken::from_authorization("bearer abc").is_some());
    }

    #[test]
    fn rejects_placeholder_tokens() {
        assert!(BearerToken::from_authorization("Bearer null").is_none());
        assert!(BearerToken::from_authorization("Bearer undefined").is_none());
        assert!(BearerToken::from_authorization("Bearer ").is_none());
        assert!(BearerToken::from_authorization("Basic dXNlcjpwYXNz").is_none());
    }

    #[test]
    fn login_body_exposes_password() {
        let creds = LoginCredentials::new("maxi", SecretString::from("s3cret!".to_owned()));
        let body = creds.to_body();
        assert_eq!(body["username"], "maxi");
        assert_eq!(body["password"], "s3cret!");
    }
}
