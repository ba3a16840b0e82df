// Live-session endpoints under `/api/chat/`.

use crate::auth::BearerToken;
use crate::client::UpstreamClient;
use crate::endpoints::ProxyEndpoint;
use crate::error::Error;
use crate::models::Session;

impl UpstreamClient {
    /// `GET /api/chat/sessions/`
    pub async fn list_sessions(&self, token: Option<&BearerToken>) -> Result<Vec<Session>, Error> {
        self.get(ProxyEndpoint::Sessions, token).await
    }
}
