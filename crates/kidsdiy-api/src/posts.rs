// Feed and resource-library endpoints under `/api/posts/`.

use crate::auth::BearerToken;
use crate::client::UpstreamClient;
use crate::endpoints::ProxyEndpoint;
use crate::error::Error;
use crate::models::{Post, Resource};

impl UpstreamClient {
    /// `GET /api/posts/posts/`
    pub async fn list_posts(&self, token: Option<&BearerToken>) -> Result<Vec<Post>, Error> {
        self.get(ProxyEndpoint::Posts, token).await
    }

    /// `GET /api/posts/resources/`
    pub async fn list_resources(&self, token: Option<&BearerToken>) -> Result<Vec<Resource>, Error> {
        self.get(ProxyEndpoint::Resources, token).await
    }

    /// `GET /api/posts/resources/{id}/`
    pub async fn get_resource(
        &self,
        id: u64,
        token: Option<&BearerToken>,
    ) -> Result<Resource, Error> {
        self.get(ProxyEndpoint::ResourceById(id), token).await
    }
}
