// ── Proxy seam ──
//
// Controllers talk to a `Proxy` rather than to `ProxyRoute` directly so
// tests can substitute a recording fake. `Gateway` layers the injected
// credential and the bounded wait on top of any `Proxy`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use kidsdiy_api::{Envelope, ProxyRequest, ProxyResponse, ProxyRoute};
use serde_json::Value;
use tracing::warn;

use crate::credential::CredentialProvider;
use crate::error::CoreError;

/// Per-call bound when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Message placed in the envelope when the bounded wait expires.
pub const TIMEOUT_MESSAGE: &str = "request timed out";

/// Anything that turns a request into an envelope.
pub trait Proxy: Send + Sync {
    fn forward(&self, request: ProxyRequest) -> impl Future<Output = ProxyResponse> + Send;
}

impl Proxy for ProxyRoute {
    fn forward(&self, request: ProxyRequest) -> impl Future<Output = ProxyResponse> + Send {
        ProxyRoute::forward(self, request)
    }
}

impl<P: Proxy> Proxy for Arc<P> {
    fn forward(&self, request: ProxyRequest) -> impl Future<Output = ProxyResponse> + Send {
        (**self).forward(request)
    }
}

/// A proxy plus the credential and timeout every page call shares.
pub struct Gateway<P> {
    proxy: Arc<P>,
    credentials: Arc<dyn CredentialProvider>,
    timeout: Duration,
}

impl<P> Clone for Gateway<P> {
    fn clone(&self) -> Self {
        Self {
            proxy: Arc::clone(&self.proxy),
            credentials: Arc::clone(&self.credentials),
            timeout: self.timeout,
        }
    }
}

impl<P: Proxy> Gateway<P> {
    pub fn new(proxy: Arc<P>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            proxy,
            credentials,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    /// Forward with the current bearer token attached, unless the
    /// request already carries one.
    pub async fn forward(&self, request: ProxyRequest) -> ProxyResponse {
        let request = if request.token.is_some() {
            request
        } else {
            let token = self.credentials.bearer();
            request.with_token(token)
        };
        self.forward_public(request).await
    }

    /// Forward as-is, without consulting the credential provider.
    pub async fn forward_public(&self, request: ProxyRequest) -> ProxyResponse {
        let path = request.path.clone();
        match tokio::time::timeout(self.timeout, self.proxy.forward(request)).await {
            Ok(resp) => resp,
            Err(_) => {
                warn!(%path, timeout_ms = self.timeout.as_millis(), "proxied call timed out");
                ProxyResponse::failed(504, TIMEOUT_MESSAGE)
            }
        }
    }

    /// Forward and unwrap the envelope into a typed outcome.
    pub async fn call(&self, request: ProxyRequest) -> Result<Value, CoreError> {
        settle(self.forward(request).await)
    }
}

/// Turn an envelope into `Ok(data)` or the classified error.
pub fn settle(response: ProxyResponse) -> Result<Value, CoreError> {
    match response.envelope {
        Envelope::Data(data) => Ok(data),
        Envelope::Error(message) => Err(CoreError::from_status(response.status, message)),
    }
}
