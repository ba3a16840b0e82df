// ── Backend wire models ──
//
// Shapes returned by the platform backend. Fields the backend may omit
// or null are optional; timestamps stay as strings and are parsed at
// render time so one odd value can't fail a whole listing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accept a JSON string or number, yielding its string form.
fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// ── Feed ───────────────────────────────────────────────────────────

/// Author block embedded in posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostAuthor {
    pub username: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub likes: u64,
    /// Humanized age computed by the backend ("2 hours ago").
    #[serde(default)]
    pub created_since: Option<String>,
    /// Image paths relative to the backend host.
    #[serde(default)]
    pub images: Vec<String>,
    pub user: PostAuthor,
}

// ── Live sessions ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionHost {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: u64,
    pub host: SessionHost,
    pub channel_name: String,
    #[serde(default)]
    pub title: Option<String>,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

// ── Account ────────────────────────────────────────────────────────

/// Read shape of a user profile, as listed by `/api/account/user-profile/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub interests: Vec<Value>,
    #[serde(default)]
    pub organization: Option<Value>,
    #[serde(default)]
    pub role: Option<Value>,
}

/// Edit shape of a profile: lookups are referenced by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub interests: Vec<u64>,
    #[serde(default)]
    pub organization: Option<u64>,
    #[serde(default)]
    pub role: Option<u64>,
}

/// Id/name pair used by the organization, role and interest lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lookup {
    pub id: u64,
    pub name: String,
}

pub type Organization = Lookup;
pub type Role = Lookup;
pub type Interest = Lookup;

/// Answer of the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Body of `POST /api/account/signup/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

// ── Resources ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAuthor {
    pub username: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub attachment: Option<String>,
    #[serde(default)]
    pub attachment_name: Option<String>,
    #[serde(default)]
    pub attachment_size: Option<u64>,
    pub user: ResourceAuthor,
}

// ── Media ──────────────────────────────────────────────────────────

/// Opaque reference to uploaded media, as handed out by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(Value);

impl MediaRef {
    /// Accepts string or numeric ids; anything else is not a reference.
    pub fn new(raw: Value) -> Option<Self> {
        match &raw {
            Value::String(s) if !s.is_empty() => Some(Self(raw)),
            Value::Number(_) => Some(Self(raw)),
            _ => None,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Result of the upload step, consumed by the following patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    pub id: MediaRef,
}

impl UploadResult {
    /// Extract the `id` from an upload response body.
    ///
    /// Returns `None` when the field is absent, null, or not an id.
    pub fn from_body(body: &Value) -> Option<Self> {
        body.get("id")
            .cloned()
            .and_then(MediaRef::new)
            .map(|id| Self { id })
    }
}
