// ── Upload-then-patch pipeline ──
//
// Stage one posts the files and yields a typed `UploadResult`; stage two
// patches the target with `{<field>: id}`. The stages run strictly in
// sequence and the patch is never issued without a media reference.

use std::fmt;

use kidsdiy_api::models::UploadResult;
use kidsdiy_api::{Envelope, MediaFile, ProxyBody, ProxyEndpoint, ProxyMethod, ProxyRequest};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::gateway::{Gateway, Proxy, settle};

/// What the page does once the patch succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AfterPatch {
    /// Write the new reference into local state.
    Optimistic,
    /// Re-run the page's load.
    #[default]
    Reload,
}

/// The resource field to point at the uploaded media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchTarget {
    pub endpoint: ProxyEndpoint,
    pub field: String,
}

impl PatchTarget {
    pub fn new(endpoint: ProxyEndpoint, field: impl Into<String>) -> Self {
        Self {
            endpoint,
            field: field.into(),
        }
    }
}

impl fmt::Display for PatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.endpoint.path(), self.field)
    }
}

/// Result of a completed pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOutcome {
    pub upload: UploadResult,
    /// Body of the patch response (the updated resource, or null).
    pub patched: Value,
    pub after: AfterPatch,
}

/// Two-stage media pipeline bound to one target field.
#[derive(Debug, Clone)]
pub struct MediaPipeline {
    target: PatchTarget,
    after: AfterPatch,
}

impl MediaPipeline {
    pub fn new(target: PatchTarget) -> Self {
        Self {
            target,
            after: AfterPatch::default(),
        }
    }

    #[must_use]
    pub fn after(mut self, after: AfterPatch) -> Self {
        self.after = after;
        self
    }

    pub fn target(&self) -> &PatchTarget {
        &self.target
    }

    /// Run both stages.
    pub async fn run<P: Proxy>(
        &self,
        gateway: &Gateway<P>,
        files: Vec<MediaFile>,
    ) -> Result<PatchOutcome, CoreError> {
        let upload = self.upload(gateway, files).await?;
        let patched = self.patch(gateway, &upload).await?;
        info!(target = %self.target, "media attached");
        Ok(PatchOutcome {
            upload,
            patched,
            after: self.after,
        })
    }

    /// Stage one. Any failure, including a 2xx without `id`, aborts.
    pub async fn upload<P: Proxy>(
        &self,
        gateway: &Gateway<P>,
        files: Vec<MediaFile>,
    ) -> Result<UploadResult, CoreError> {
        if files.is_empty() {
            return Err(CoreError::validation("no files selected"));
        }
        debug!(parts = files.len(), "uploading media");

        let request = ProxyRequest::endpoint(ProxyMethod::Post, ProxyEndpoint::MediaUpload)
            .with_body(ProxyBody::Multipart(files));
        let response = gateway.forward(request).await;

        match response.envelope {
            Envelope::Data(body) => UploadResult::from_body(&body).ok_or_else(|| {
                warn!("upload answered without a media id");
                CoreError::UploadAborted {
                    message: kidsdiy_api::Error::MissingMediaReference.to_string(),
                }
            }),
            Envelope::Error(message) => {
                warn!(%message, "upload failed; skipping patch");
                Err(CoreError::UploadAborted { message })
            }
        }
    }

    /// Stage two: `PATCH target {field: id}`.
    pub async fn patch<P: Proxy>(
        &self,
        gateway: &Gateway<P>,
        upload: &UploadResult,
    ) -> Result<Value, CoreError> {
        let mut body = Map::new();
        body.insert(self.target.field.clone(), upload.id.as_value().clone());

        let request = ProxyRequest::endpoint(ProxyMethod::Patch, self.target.endpoint)
            .with_body(ProxyBody::Json(Value::Object(body)));
        settle(gateway.forward(request).await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bytes::Bytes;
    use kidsdiy_api::ProxyMethod;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::testing::{FakeProxy, gateway};

    fn avatar() -> Vec<MediaFile> {
        vec![MediaFile::image("me.png", "image/png", Bytes::from_static(b"png"))]
    }

    fn pipeline() -> MediaPipeline {
        MediaPipeline::new(PatchTarget::new(ProxyEndpoint::ProfileById(7), "profile_picture"))
    }

    #[tokio::test]
    async fn patches_with_uploaded_reference() {
        let proxy = FakeProxy::new();
        proxy.ok(ProxyMethod::Post, "/api/posts/media/", json!({"id": 42}));
        proxy.ok(ProxyMethod::Patch, "/api/account/user-profile/7/", json!({"id": 7}));

        let outcome = pipeline().run(&gateway(&proxy), avatar()).await.unwrap();
        assert_eq!(outcome.upload.id.as_value(), &json!(42));
        assert_eq!(outcome.after, AfterPatch::Reload);

        let calls = proxy.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, ProxyMethod::Post);
        assert!(matches!(calls[0].body, ProxyBody::Multipart(ref f) if f[0].field == "images"));
        assert_eq!(calls[1].body, ProxyBody::Json(json!({"profile_picture": 42})));
    }

    #[tokio::test]
    async fn missing_id_never_patches() {
        let proxy = FakeProxy::new();
        proxy.ok(ProxyMethod::Post, "/api/posts/media/", json!({"ok": true}));
        proxy.ok(ProxyMethod::Patch, "/api/account/user-profile/7/", json!({}));

        let err = pipeline().run(&gateway(&proxy), avatar()).await.unwrap_err();
        assert!(matches!(err, CoreError::UploadAborted { .. }));
        assert_eq!(proxy.count(ProxyMethod::Patch), 0);
    }

    #[tokio::test]
    async fn failed_upload_never_patches() {
        let proxy = FakeProxy::new();
        proxy.fail(ProxyMethod::Post, "/api/posts/media/", "File too large");

        let err = pipeline().run(&gateway(&proxy), avatar()).await.unwrap_err();
        assert_eq!(err.to_string(), "File too large");
        assert_eq!(proxy.count(ProxyMethod::Patch), 0);
    }

    #[tokio::test]
    async fn empty_selection_is_rejected_before_any_call() {
        let proxy = FakeProxy::new();
        let err = pipeline().run(&gateway(&proxy), Vec::new()).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert!(proxy.calls().is_empty());
    }
}
