// Recording fake proxy shared by the unit tests.
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use kidsdiy_api::{ProxyMethod, ProxyRequest, ProxyResponse};
use serde_json::Value;
use tokio::sync::Notify;

use crate::credential::StaticCredential;
use crate::gateway::{Gateway, Proxy};

struct Route {
    response: ProxyResponse,
    gate: Option<Arc<Notify>>,
}

/// Answers scripted responses per (method, path) and records every call.
#[derive(Default)]
pub(crate) struct FakeProxy {
    routes: Mutex<HashMap<(ProxyMethod, String), Route>>,
    calls: Mutex<Vec<ProxyRequest>>,
}

impl FakeProxy {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn ok(&self, method: ProxyMethod, path: &str, body: Value) {
        self.respond(method, path, ProxyResponse::ok(body), None);
    }

    pub(crate) fn fail(&self, method: ProxyMethod, path: &str, message: &str) {
        self.respond(method, path, ProxyResponse::failed(500, message), None);
    }

    /// Answer only after `gate` is notified.
    pub(crate) fn gated(&self, method: ProxyMethod, path: &str, body: Value) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.respond(method, path, ProxyResponse::ok(body), Some(Arc::clone(&gate)));
        gate
    }

    fn respond(&self, method: ProxyMethod, path: &str, response: ProxyResponse, gate: Option<Arc<Notify>>) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_owned()), Route { response, gate });
    }

    pub(crate) fn calls(&self) -> Vec<ProxyRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, method: ProxyMethod) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method)
            .count()
    }
}

impl Proxy for FakeProxy {
    fn forward(&self, request: ProxyRequest) -> impl Future<Output = ProxyResponse> + Send {
        let key = (request.method, request.path.clone());
        self.calls.lock().unwrap().push(request);
        let (response, gate) = match self.routes.lock().unwrap().get(&key) {
            Some(route) => (route.response.clone(), route.gate.clone()),
            None => (ProxyResponse::failed(500, "no route"), None),
        };
        async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            response
        }
    }
}

pub(crate) fn gateway(proxy: &Arc<FakeProxy>) -> Gateway<FakeProxy> {
    Gateway::new(
        Arc::clone(proxy),
        Arc::new(StaticCredential::new(Some(kidsdiy_api::BearerToken::new("tok123")))),
    )
}
