// Own profile: the first entry of the user-profile listing.

use kidsdiy_api::models::Profile;
use kidsdiy_api::{ProxyEndpoint, ProxyMethod, ProxyRequest};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::controller::{View, ViewController, decode, take_bodies};
use crate::error::CoreError;
use crate::render::{format_date, full_name, join_labels, lookup_label, media_url};

pub type ProfilePage<P> = ViewController<P, ProfileView>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileCard {
    pub id: u64,
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub biography: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub interests: String,
    pub organization: Option<String>,
    pub role: Option<String>,
}

impl ProfileCard {
    pub fn from_profile(p: Profile, media_base: &Url) -> Self {
        Self {
            id: p.id,
            full_name: full_name(&p.first_name, &p.last_name, &p.username),
            avatar_url: media_url(media_base, p.profile_picture.as_deref()),
            date_of_birth: p.date_of_birth.as_deref().map(format_date),
            interests: join_labels(&p.interests),
            organization: p.organization.as_ref().and_then(lookup_label),
            role: p.role.as_ref().and_then(lookup_label),
            username: p.username,
            email: p.email,
            biography: p.biography,
            phone_number: p.phone_number,
        }
    }
}

pub struct ProfileView {
    media_base: Url,
}

impl ProfileView {
    pub fn new(media_base: Url) -> Self {
        Self { media_base }
    }
}

impl View for ProfileView {
    type Payload = ProfileCard;

    fn requests(&self) -> Vec<ProxyRequest> {
        vec![ProxyRequest::endpoint(ProxyMethod::Get, ProxyEndpoint::UserProfile)]
    }

    fn merge(&self, bodies: Vec<Value>) -> Result<Self::Payload, CoreError> {
        let [profiles] = take_bodies(bodies)?;
        let profiles: Vec<Profile> = decode(profiles)?;
        profiles
            .into_iter()
            .next()
            .map(|p| ProfileCard::from_profile(p, &self.media_base))
            .ok_or_else(|| CoreError::NotFound {
                message: "profile not found".into(),
            })
    }
}
