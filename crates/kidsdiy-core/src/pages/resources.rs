// Resource library: the searchable list and the single-resource view.

use kidsdiy_api::models::Resource;
use kidsdiy_api::{ProxyEndpoint, ProxyMethod, ProxyRequest};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::controller::{View, ViewController, decode, take_bodies};
use crate::error::CoreError;
use crate::gateway::Proxy;
use crate::render::{file_size, media_url};
use crate::search::{Titled, filter_by_title};

pub const RESOURCE_NOT_FOUND: &str = "Resource not found";

pub type ResourcesPage<P> = ViewController<P, ResourcesView>;
pub type ResourceDetailPage<P> = ViewController<P, ResourceDetailView>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceCard {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub kind: Option<String>,
    pub author: String,
    pub organization: Option<String>,
    pub role: Option<String>,
    pub avatar_url: Option<String>,
    pub attachment_url: Option<String>,
    pub attachment_name: Option<String>,
    pub attachment_size: Option<String>,
}

impl ResourceCard {
    pub fn from_resource(r: Resource, media_base: &Url) -> Self {
        Self {
            id: r.id,
            avatar_url: media_url(media_base, r.user.profile_picture.as_deref()),
            attachment_url: media_url(media_base, r.attachment.as_deref()),
            attachment_size: r.attachment_size.map(file_size),
            title: r.title,
            content: r.content,
            kind: r.kind,
            author: r.user.username,
            organization: r.user.organization,
            role: r.user.role,
            attachment_name: r.attachment_name,
        }
    }
}

impl Titled for ResourceCard {
    fn title(&self) -> &str {
        &self.title
    }
}

// ── List ────────────────────────────────────────────────────────────

pub struct ResourcesView {
    media_base: Url,
}

impl ResourcesView {
    pub fn new(media_base: Url) -> Self {
        Self { media_base }
    }
}

impl View for ResourcesView {
    type Payload = Vec<ResourceCard>;

    fn requests(&self) -> Vec<ProxyRequest> {
        vec![ProxyRequest::endpoint(ProxyMethod::Get, ProxyEndpoint::Resources)]
    }

    fn merge(&self, bodies: Vec<Value>) -> Result<Self::Payload, CoreError> {
        let [resources] = take_bodies(bodies)?;
        let resources: Vec<Resource> = decode(resources)?;
        Ok(resources
            .into_iter()
            .map(|r| ResourceCard::from_resource(r, &self.media_base))
            .collect())
    }
}

impl<P: Proxy> ViewController<P, ResourcesView> {
    /// Loaded resources whose title contains `query`, ignoring case.
    /// Empty until the list is ready.
    pub fn search(&self, query: &str) -> Vec<ResourceCard> {
        self.state()
            .payload
            .map(|all| filter_by_title(&all, query).into_iter().cloned().collect())
            .unwrap_or_default()
    }
}

// ── Detail ──────────────────────────────────────────────────────────

pub struct ResourceDetailView {
    id: u64,
    media_base: Url,
}

impl ResourceDetailView {
    pub fn new(id: u64, media_base: Url) -> Self {
        Self { id, media_base }
    }
}

impl View for ResourceDetailView {
    type Payload = ResourceCard;

    fn requests(&self) -> Vec<ProxyRequest> {
        vec![ProxyRequest::endpoint(ProxyMethod::Get, ProxyEndpoint::ResourceById(self.id))]
    }

    fn merge(&self, bodies: Vec<Value>) -> Result<Self::Payload, CoreError> {
        let [resource] = take_bodies(bodies)?;
        if resource.is_null() {
            return Err(CoreError::NotFound {
                message: RESOURCE_NOT_FOUND.into(),
            });
        }
        let resource: Resource = decode(resource)?;
        Ok(ResourceCard::from_resource(resource, &self.media_base))
    }

    fn describe_failure(&self, status: u16, message: String) -> String {
        if status == 404 {
            RESOURCE_NOT_FOUND.into()
        } else {
            message
        }
    }
}
