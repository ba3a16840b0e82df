// ── Login, signup, logout ──
//
// Login stores the `accessToken` cookie and sends the user home; signup
// sends them to the login screen. Failures surface a fixed user-facing
// message; the backend's reason is logged.

use std::sync::Arc;

use kidsdiy_api::models::{SignupRequest, TokenResponse};
use kidsdiy_api::{LoginCredentials, ProxyBody, ProxyEndpoint, ProxyMethod, ProxyRequest};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{info, warn};

use crate::controller::decode;
use crate::credential::CookieCredentialStore;
use crate::error::CoreError;
use crate::gateway::{Gateway, Proxy, settle};

pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
pub const REGISTRATION_FAILED: &str = "Registration failed. Please check your details.";
pub const MIN_PASSWORD_LEN: usize = 6;

/// Where the client navigates after an auth flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Redirect {
    Home,
    Login,
}

impl Redirect {
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/home",
            Self::Login => "/login",
        }
    }
}

fn check_password(password: &SecretString) -> Result<(), CoreError> {
    if password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{field} is required")));
    }
    Ok(())
}

// ── Login ───────────────────────────────────────────────────────────

pub struct LoginFlow<P> {
    gateway: Gateway<P>,
    store: Arc<CookieCredentialStore>,
}

impl<P: Proxy> LoginFlow<P> {
    pub fn new(gateway: Gateway<P>, store: Arc<CookieCredentialStore>) -> Self {
        Self { gateway, store }
    }

    /// Exchange credentials for a token and persist it.
    pub async fn submit(&self, credentials: &LoginCredentials) -> Result<Redirect, CoreError> {
        require("username", &credentials.username)?;
        check_password(&credentials.password)?;

        let request = ProxyRequest::endpoint(ProxyMethod::Post, ProxyEndpoint::Token)
            .with_body(ProxyBody::Json(credentials.to_body()));

        let token: TokenResponse = match settle(self.gateway.forward_public(request).await)
            .and_then(decode)
        {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, username = %credentials.username, "login rejected");
                return Err(CoreError::Unauthorized {
                    message: LOGIN_FAILED.into(),
                });
            }
        };

        self.store.store(&token.access)?;
        info!(username = %credentials.username, "logged in");
        Ok(Redirect::Home)
    }
}

// ── Signup ──────────────────────────────────────────────────────────

pub struct SignupFlow<P> {
    gateway: Gateway<P>,
}

impl<P: Proxy> SignupFlow<P> {
    pub fn new(gateway: Gateway<P>) -> Self {
        Self { gateway }
    }

    pub async fn submit(&self, request: &SignupRequest) -> Result<Redirect, CoreError> {
        require("username", &request.username)?;
        require("email", &request.email)?;
        require("first name", &request.first_name)?;
        require("last name", &request.last_name)?;
        if !request.email.contains('@') {
            return Err(CoreError::validation("email address is not valid"));
        }
        check_password(&SecretString::from(request.password.clone()))?;

        let body = serde_json::to_value(request).map_err(|e| CoreError::Internal(e.to_string()))?;
        let call = ProxyRequest::endpoint(ProxyMethod::Post, ProxyEndpoint::Signup)
            .with_body(ProxyBody::Json(body));

        match settle(self.gateway.forward_public(call).await) {
            Ok(_) => {
                info!(username = %request.username, "account registered");
                Ok(Redirect::Login)
            }
            Err(e) => {
                warn!(error = %e, username = %request.username, "registration rejected");
                Err(CoreError::Api {
                    message: REGISTRATION_FAILED.into(),
                    status: None,
                })
            }
        }
    }
}

// ── Logout ──────────────────────────────────────────────────────────

/// Drop the stored token.
pub fn logout(store: &CookieCredentialStore) -> Result<Redirect, CoreError> {
    store.clear()?;
    Ok(Redirect::Login)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::credential::CredentialProvider;
    use crate::testing::{FakeProxy, gateway};

    fn creds(password: &str) -> LoginCredentials {
        LoginCredentials::new("ada", SecretString::from(password.to_owned()))
    }

    #[tokio::test]
    async fn login_stores_cookie_and_redirects_home() {
        let proxy = FakeProxy::new();
        proxy.ok(ProxyMethod::Post, "/api/token/", json!({"access": "tok123", "refresh": "r"}));
        let store = Arc::new(CookieCredentialStore::in_memory());

        let flow = LoginFlow::new(gateway(&proxy), Arc::clone(&store));
        let redirect = flow.submit(&creds("secret1")).await.unwrap();

        assert_eq!(redirect, Redirect::Home);
        assert_eq!(redirect.path(), "/home");
        let cookie = store.cookie().unwrap();
        assert_eq!(cookie.name, "accessToken");
        assert_eq!(cookie.value, "tok123");
        assert_eq!(store.bearer().unwrap().expose(), "tok123");

        let call = &proxy.calls()[0];
        assert!(call.token.is_none());
        assert_eq!(call.body, ProxyBody::Json(json!({"username": "ada", "password": "secret1"})));
    }

    #[tokio::test]
    async fn rejected_login_shows_fixed_message() {
        let proxy = FakeProxy::new();
        proxy.fail(ProxyMethod::Post, "/api/token/", "No active account");
        let store = Arc::new(CookieCredentialStore::in_memory());

        let err = LoginFlow::new(gateway(&proxy), Arc::clone(&store))
            .submit(&creds("secret1"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), LOGIN_FAILED);
        assert!(store.cookie().is_none());
    }

    #[tokio::test]
    async fn short_password_never_calls_backend() {
        let proxy = FakeProxy::new();
        let flow = LoginFlow::new(gateway(&proxy), Arc::new(CookieCredentialStore::in_memory()));

        let err = flow.submit(&creds("12345")).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert!(proxy.calls().is_empty());
    }

    fn signup() -> SignupRequest {
        SignupRequest {
            username: "ada".into(),
            email: "ada@example.test".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            password: "secret1".into(),
        }
    }

    #[tokio::test]
    async fn signup_redirects_to_login() {
        let proxy = FakeProxy::new();
        proxy.ok(ProxyMethod::Post, "/api/account/signup/", json!({"id": 3}));

        let redirect = SignupFlow::new(gateway(&proxy)).submit(&signup()).await.unwrap();
        assert_eq!(redirect, Redirect::Login);
    }

    #[tokio::test]
    async fn failed_signup_shows_fixed_message() {
        let proxy = FakeProxy::new();
        proxy.fail(ProxyMethod::Post, "/api/account/signup/", "username taken");

        let err = SignupFlow::new(gateway(&proxy)).submit(&signup()).await.unwrap_err();
        assert_eq!(err.to_string(), REGISTRATION_FAILED);
    }

    #[test]
    fn logout_clears_token() {
        let store = CookieCredentialStore::in_memory();
        store.store("tok123").unwrap();
        assert_eq!(logout(&store).unwrap(), Redirect::Login);
        assert!(store.bearer().is_none());
    }
}
