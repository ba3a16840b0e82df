// ── Proxy route ──
//
// Forwards a request upstream and reshapes whatever comes back into the
// `{data}` / `{error}` envelope. Never fails: every failure mode ends up
// as an error envelope with a status chosen by the `StatusPolicy`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::UpstreamClient;
use crate::envelope::Envelope;
use crate::error::Error;
use crate::request::ProxyRequest;

/// Failure message when neither the backend nor the route supplies one.
pub const DEFAULT_FAILURE_MESSAGE: &str = "request failed";

/// How upstream failures map onto the proxy's own status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Every failure answers 500.
    #[default]
    Collapse,
    /// Echo the upstream status; transport failures answer 502/504.
    Preserve,
}

/// Status code plus envelope, ready to be written to a client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProxyResponse {
    pub status: u16,
    pub envelope: Envelope<Value>,
}

impl ProxyResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            status: 200,
            envelope: Envelope::Data(data),
        }
    }

    pub fn failed(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            envelope: Envelope::Error(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.envelope.is_data()
    }
}

/// Stateless forwarder in front of the backend.
#[derive(Debug, Clone)]
pub struct ProxyRoute {
    client: UpstreamClient,
    policy: StatusPolicy,
}

impl ProxyRoute {
    pub fn new(client: UpstreamClient, policy: StatusPolicy) -> Self {
        Self { client, policy }
    }

    /// The typed client this route forwards through.
    pub fn client(&self) -> &UpstreamClient {
        &self.client
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    /// Forward `request` and wrap the outcome.
    pub async fn forward(&self, request: ProxyRequest) -> ProxyResponse {
        let fallback = request
            .fallback
            .as_deref()
            .unwrap_or(DEFAULT_FAILURE_MESSAGE);

        match self.client.execute(&request, fallback).await {
            Ok(body) => {
                debug!(method = %request.method, path = %request.path, "proxied call succeeded");
                ProxyResponse::ok(body)
            }
            Err(err) => {
                warn!(
                    method = %request.method,
                    path = %request.path,
                    upstream_status = err.upstream_status(),
                    transient = err.is_transient(),
                    error = %err,
                    "proxied call failed"
                );
                ProxyResponse::failed(self.failure_status(&err), err.envelope_message())
            }
        }
    }

    fn failure_status(&self, err: &Error) -> u16 {
        match self.policy {
            StatusPolicy::Collapse => 500,
            StatusPolicy::Preserve => match err {
                Error::Upstream { status, .. } => *status,
                Error::Authentication { .. } => 401,
                Error::Timeout { .. } => 504,
                Error::Transport(_) | Error::Deserialization { .. } => 502,
                _ => 500,
            },
        }
    }
}
