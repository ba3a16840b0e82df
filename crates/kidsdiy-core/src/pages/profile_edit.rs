// ── Profile edit ──
//
// Loads the editable record together with the three lookup lists,
// PATCHes only changed fields, and attaches a new avatar through the
// media pipeline.

use kidsdiy_api::models::{Interest, Lookup, Organization, ProfileRecord, Role};
use kidsdiy_api::{MediaFile, ProxyBody, ProxyEndpoint, ProxyMethod, ProxyRequest};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

use crate::controller::{View, ViewController, decode, take_bodies};
use crate::error::CoreError;
use crate::gateway::Proxy;
use crate::profile::ProfileUpdate;
use crate::render::media_url;
use crate::upload::{AfterPatch, MediaPipeline, PatchOutcome, PatchTarget};
use crate::view_state::ViewStatus;

/// Profile field the avatar pipeline patches.
pub const AVATAR_FIELD: &str = "profile_picture";

pub type ProfileEditPage<P> = ViewController<P, ProfileEditView>;

/// Everything the edit form needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileForm {
    pub record: ProfileRecord,
    pub avatar_url: Option<String>,
    pub organizations: Vec<Organization>,
    pub roles: Vec<Role>,
    pub interests: Vec<Interest>,
}

impl ProfileForm {
    pub fn organization_name(&self) -> Option<&str> {
        name_of(&self.organizations, self.record.organization?)
    }

    pub fn role_name(&self) -> Option<&str> {
        name_of(&self.roles, self.record.role?)
    }

    pub fn interest_names(&self) -> Vec<&str> {
        self.record
            .interests
            .iter()
            .filter_map(|id| name_of(&self.interests, *id))
            .collect()
    }
}

fn name_of(items: &[Lookup], id: u64) -> Option<&str> {
    items.iter().find(|l| l.id == id).map(|l| l.name.as_str())
}

pub struct ProfileEditView {
    id: u64,
    media_base: Url,
}

impl ProfileEditView {
    pub fn new(id: u64, media_base: Url) -> Self {
        Self { id, media_base }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    fn avatar_pipeline(&self) -> MediaPipeline {
        MediaPipeline::new(PatchTarget::new(ProxyEndpoint::ProfileById(self.id), AVATAR_FIELD))
    }
}

impl View for ProfileEditView {
    type Payload = ProfileForm;

    fn requests(&self) -> Vec<ProxyRequest> {
        [
            ProxyEndpoint::ProfileById(self.id),
            ProxyEndpoint::Organizations,
            ProxyEndpoint::Roles,
            ProxyEndpoint::Interests,
        ]
        .into_iter()
        .map(|e| ProxyRequest::endpoint(ProxyMethod::Get, e))
        .collect()
    }

    fn merge(&self, bodies: Vec<Value>) -> Result<Self::Payload, CoreError> {
        let [record, organizations, roles, interests] = take_bodies(bodies)?;
        let record: ProfileRecord = decode(record)?;
        Ok(ProfileForm {
            avatar_url: media_url(&self.media_base, record.profile_picture.as_deref()),
            record,
            organizations: decode(organizations)?,
            roles: decode(roles)?,
            interests: decode(interests)?,
        })
    }
}

impl<P: Proxy> ViewController<P, ProfileEditView> {
    /// PATCH the changed fields, then reload (ready → loading).
    pub async fn submit(&self, update: ProfileUpdate) -> Result<ViewStatus, CoreError> {
        let current = self
            .state()
            .payload
            .filter(|_| self.status() == ViewStatus::Ready)
            .ok_or(CoreError::InvalidTransition {
                from: self.status(),
                to: ViewStatus::Loading,
            })?;

        let update = update.diff_against(&current.record);
        if update.is_empty() {
            return Err(CoreError::validation("nothing to update"));
        }

        let body = serde_json::to_value(&update).map_err(|e| CoreError::Internal(e.to_string()))?;
        let request = ProxyRequest::endpoint(ProxyMethod::Patch, ProxyEndpoint::ProfileById(self.view().id))
            .with_body(ProxyBody::Json(body));
        self.gateway().call(request).await?;
        info!(id = self.view().id, "profile updated");

        self.refresh().await
    }

    /// Upload `files` and point `profile_picture` at the result.
    pub async fn change_avatar(
        &self,
        files: Vec<MediaFile>,
        after: AfterPatch,
    ) -> Result<PatchOutcome, CoreError> {
        let outcome = self
            .view()
            .avatar_pipeline()
            .after(after)
            .run(self.gateway(), files)
            .await?;

        match outcome.after {
            AfterPatch::Reload => {
                self.reload().await?;
            }
            AfterPatch::Optimistic => {
                let picture = outcome
                    .patched
                    .get(AVATAR_FIELD)
                    .and_then(Value::as_str)
                    .map(str::to_owned);
                if let Some(picture) = picture {
                    let media_base = &self.view().media_base;
                    self.update_payload(|form| {
                        form.avatar_url = media_url(media_base, Some(&picture));
                        form.record.profile_picture = Some(picture);
                    });
                } else {
                    warn!(id = self.view().id, "patch response has no profile_picture, reloading");
                    self.reload().await?;
                }
            }
        }
        Ok(outcome)
    }
}
