// Media upload endpoint
//
// Multipart POST of one or more `images` parts; the backend answers
// with `{id}` that later PATCHes reference.

use serde_json::Value;
use tracing::debug;

use crate::auth::BearerToken;
use crate::client::UpstreamClient;
use crate::endpoints::ProxyEndpoint;
use crate::error::Error;
use crate::models::UploadResult;
use crate::request::MediaFile;

impl UpstreamClient {
    /// Upload media and return its reference.
    ///
    /// A 2xx answer without a usable `id` is [`Error::MissingMediaReference`].
    pub async fn upload_media(
        &self,
        files: Vec<MediaFile>,
        token: Option<&BearerToken>,
    ) -> Result<UploadResult, Error> {
        debug!(parts = files.len(), "uploading media");
        let body: Value = self
            .post_multipart(ProxyEndpoint::MediaUpload, files, token)
            .await?;
        UploadResult::from_body(&body).ok_or(Error::MissingMediaReference)
    }
}
