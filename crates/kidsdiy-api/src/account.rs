// Account endpoints
//
// Token issue, signup, and the profile/lookup resources under
// `/api/account/`.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::auth::{BearerToken, LoginCredentials};
use crate::client::UpstreamClient;
use crate::endpoints::ProxyEndpoint;
use crate::error::Error;
use crate::models::{Interest, Organization, Profile, ProfileRecord, Role, SignupRequest, TokenResponse};

impl UpstreamClient {
    /// Exchange a username/password for an access token.
    ///
    /// `POST /api/token/`. Any non-2xx answer is reported as
    /// [`Error::Authentication`].
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<TokenResponse, Error> {
        debug!(username = %credentials.username, "requesting access token");
        self.post(ProxyEndpoint::Token, &credentials.to_body(), None)
            .await
            .map_err(|e| match e {
                Error::Upstream { status, message } => Error::Authentication {
                    message: format!("{message} (HTTP {status})"),
                },
                other => other,
            })
    }

    /// Register a new account. `POST /api/account/signup/`
    pub async fn signup(&self, request: &SignupRequest) -> Result<Value, Error> {
        debug!(username = %request.username, "registering account");
        self.post(ProxyEndpoint::Signup, request, None).await
    }

    /// Profiles visible to the caller; the first one is their own.
    ///
    /// `GET /api/account/user-profile/`
    pub async fn list_profiles(&self, token: Option<&BearerToken>) -> Result<Vec<Profile>, Error> {
        self.get(ProxyEndpoint::UserProfile, token).await
    }

    /// `GET /api/account/user-profile/{id}/`
    pub async fn get_profile_record(
        &self,
        id: u64,
        token: Option<&BearerToken>,
    ) -> Result<ProfileRecord, Error> {
        self.get(ProxyEndpoint::ProfileById(id), token).await
    }

    /// Partially update a profile. `PATCH /api/account/user-profile/{id}/`
    pub async fn patch_profile<B: Serialize + Sync>(
        &self,
        id: u64,
        changes: &B,
        token: Option<&BearerToken>,
    ) -> Result<Value, Error> {
        debug!(id, "patching profile");
        self.patch(ProxyEndpoint::ProfileById(id), changes, token).await
    }

    /// `GET /api/account/organizations/`
    pub async fn list_organizations(
        &self,
        token: Option<&BearerToken>,
    ) -> Result<Vec<Organization>, Error> {
        self.get(ProxyEndpoint::Organizations, token).await
    }

    /// `GET /api/account/roles/`
    pub async fn list_roles(&self, token: Option<&BearerToken>) -> Result<Vec<Role>, Error> {
        self.get(ProxyEndpoint::Roles, token).await
    }

    /// `GET /api/account/interests/`
    pub async fn list_interests(&self, token: Option<&BearerToken>) -> Result<Vec<Interest>, Error> {
        self.get(ProxyEndpoint::Interests, token).await
    }
}
