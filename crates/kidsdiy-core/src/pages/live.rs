// Live classes: session listing and the channel to join.

use kidsdiy_api::models::Session;
use kidsdiy_api::{ProxyEndpoint, ProxyMethod, ProxyRequest};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::controller::{View, ViewController, decode, take_bodies};
use crate::error::CoreError;
use crate::gateway::Proxy;
use crate::render::{format_datetime, full_name};

pub type LivePage<P> = ViewController<P, LiveView>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionCard {
    pub id: u64,
    pub title: String,
    pub channel: String,
    pub host_name: String,
    pub starts: String,
    pub ends: Option<String>,
    pub live: bool,
}

impl From<Session> for SessionCard {
    fn from(s: Session) -> Self {
        Self {
            id: s.id,
            title: s.title.unwrap_or_else(|| s.channel_name.clone()),
            host_name: full_name(&s.host.first_name, &s.host.last_name, &s.host.username),
            starts: format_datetime(&s.start_time),
            ends: s.end_time.as_deref().map(format_datetime),
            live: s.is_active,
            channel: s.channel_name,
        }
    }
}

#[derive(Debug, Default)]
pub struct LiveView;

impl View for LiveView {
    type Payload = Vec<SessionCard>;

    fn requests(&self) -> Vec<ProxyRequest> {
        vec![ProxyRequest::endpoint(ProxyMethod::Get, ProxyEndpoint::Sessions)]
    }

    fn merge(&self, bodies: Vec<Value>) -> Result<Self::Payload, CoreError> {
        let [sessions] = take_bodies(bodies)?;
        let sessions: Vec<Session> = decode(sessions)?;
        Ok(sessions.into_iter().map(SessionCard::from).collect())
    }
}

impl<P: Proxy> ViewController<P, LiveView> {
    /// Channel name for "Join Class", if the session is listed.
    pub fn join(&self, id: u64) -> Option<String> {
        let state = self.state();
        let channel = state
            .payload?
            .into_iter()
            .find(|s| s.id == id)
            .map(|s| s.channel)?;
        info!(id, %channel, "joining session");
        Some(channel)
    }
}
