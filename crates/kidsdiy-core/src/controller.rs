// ── View controller ──
//
// Owns one page's `ViewState`, issues the page's calls concurrently, waits
// for all of them, and publishes every transition on a watch channel.
// After `teardown` any late completion is dropped without touching state.

use futures_util::future::join_all;
use kidsdiy_api::ProxyRequest;
use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::gateway::{Gateway, Proxy};
use crate::view_state::{ViewState, ViewStatus};

/// Page-specific half of a controller: what to fetch and how to merge it.
pub trait View: Send + Sync {
    type Payload: Clone + Send + Sync + 'static;

    /// Calls issued on every load, in a fixed order.
    fn requests(&self) -> Vec<ProxyRequest>;

    /// Combine the bodies (same order as `requests`) into the payload.
    fn merge(&self, bodies: Vec<Value>) -> Result<Self::Payload, CoreError>;

    /// Message recorded for a failed call. Defaults to the envelope text.
    fn describe_failure(&self, _status: u16, message: String) -> String {
        message
    }
}

/// Controller for one mounted page.
pub struct ViewController<P, V: View> {
    gateway: Gateway<P>,
    view: V,
    state: watch::Sender<ViewState<V::Payload>>,
    alive: CancellationToken,
}

impl<P: Proxy, V: View> ViewController<P, V> {
    pub fn new(gateway: Gateway<P>, view: V) -> Self {
        let (state, _) = watch::channel(ViewState::idle());
        Self {
            gateway,
            view,
            state,
            alive: CancellationToken::new(),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn gateway(&self) -> &Gateway<P> {
        &self.gateway
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ViewState<V::Payload> {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> ViewStatus {
        self.state.borrow().status
    }

    /// Observe transitions.
    pub fn subscribe(&self) -> watch::Receiver<ViewState<V::Payload>> {
        self.state.subscribe()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// First load: idle → loading → ready | error.
    pub async fn mount(&self) -> Result<ViewStatus, CoreError> {
        self.load(&[ViewStatus::Idle]).await
    }

    /// Re-enter loading after an error.
    pub async fn retry(&self) -> Result<ViewStatus, CoreError> {
        self.load(&[ViewStatus::Error]).await
    }

    /// Re-enter loading from ready, e.g. after a submit.
    pub async fn refresh(&self) -> Result<ViewStatus, CoreError> {
        self.load(&[ViewStatus::Ready]).await
    }

    /// Reload from whichever settled state the view is in.
    pub async fn reload(&self) -> Result<ViewStatus, CoreError> {
        self.load(&[ViewStatus::Ready, ViewStatus::Error]).await
    }

    /// Mark the view gone. Pending loads finish without mutating state.
    pub fn teardown(&self) {
        debug!("view torn down");
        self.alive.cancel();
    }

    pub fn is_alive(&self) -> bool {
        !self.alive.is_cancelled()
    }

    /// Apply a local change to a ready payload without reloading.
    pub fn update_payload(&self, f: impl FnOnce(&mut V::Payload)) {
        if !self.is_alive() {
            return;
        }
        self.state.send_if_modified(|state| match state.payload.as_mut() {
            Some(payload) if state.status == ViewStatus::Ready => {
                f(payload);
                true
            }
            _ => false,
        });
    }

    async fn load(&self, from: &[ViewStatus]) -> Result<ViewStatus, CoreError> {
        if !self.is_alive() {
            return Ok(self.status());
        }
        self.begin(from)?;

        let calls = self
            .view
            .requests()
            .into_iter()
            .map(|request| self.gateway.forward(request));

        let responses = tokio::select! {
            () = self.alive.cancelled() => {
                debug!("discarding load for torn-down view");
                return Ok(self.status());
            }
            responses = join_all(calls) => responses,
        };
        if !self.is_alive() {
            return Ok(self.status());
        }

        // First failure in request order wins.
        let mut bodies = Vec::with_capacity(responses.len());
        let mut failure = None;
        for response in responses {
            let status = response.status;
            match response.envelope.into_result() {
                Ok(body) => bodies.push(body),
                Err(message) => {
                    failure = Some(self.view.describe_failure(status, message));
                    break;
                }
            }
        }

        let outcome = match failure {
            Some(message) => Err(message),
            None => self.view.merge(bodies).map_err(|e| e.to_string()),
        };

        self.settle(outcome)
    }

    fn begin(&self, from: &[ViewStatus]) -> Result<(), CoreError> {
        let mut result = Ok(());
        self.state.send_if_modified(|state| {
            if !from.contains(&state.status) {
                result = Err(CoreError::InvalidTransition {
                    from: state.status,
                    to: ViewStatus::Loading,
                });
                return false;
            }
            result = state.begin_loading();
            result.is_ok()
        });
        result
    }

    fn settle(&self, outcome: Result<V::Payload, String>) -> Result<ViewStatus, CoreError> {
        let mut result = Ok(());
        self.state.send_modify(|state| {
            result = match outcome {
                Ok(payload) => state.succeed(payload),
                Err(message) => {
                    warn!(%message, "view load failed");
                    state.fail(message)
                }
            };
        });
        result.map(|()| self.status())
    }
}

/// Split merged bodies into a fixed-size array, in request order.
pub fn take_bodies<const N: usize>(bodies: Vec<Value>) -> Result<[Value; N], CoreError> {
    let got = bodies.len();
    bodies
        .try_into()
        .map_err(|_| CoreError::Internal(format!("expected {N} response bodies, got {got}")))
}

/// Decode one body into a wire model.
pub fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, CoreError> {
    serde_json::from_value(body)
        .map_err(|e| CoreError::Internal(format!("unexpected response shape: {e}")))
}
