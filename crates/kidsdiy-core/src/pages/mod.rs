// ── Pages ──
//
// One `View` per screen of the web client. A page is a
// `ViewController<P, XView>`; page-specific actions are inherent impls
// on that controller type.

pub mod auth;
pub mod feed;
pub mod live;
pub mod profile;
pub mod profile_edit;
pub mod resources;

pub use auth::{LOGIN_FAILED, LoginFlow, MIN_PASSWORD_LEN, REGISTRATION_FAILED, Redirect, SignupFlow, logout};
pub use feed::{FeedPage, FeedView, PostCard};
pub use live::{LivePage, LiveView, SessionCard};
pub use profile::{ProfileCard, ProfilePage, ProfileView};
pub use profile_edit::{ProfileEditPage, ProfileEditView, ProfileForm};
pub use resources::{
    RESOURCE_NOT_FOUND, ResourceCard, ResourceDetailPage, ResourceDetailView, ResourcesPage,
    ResourcesView,
};
