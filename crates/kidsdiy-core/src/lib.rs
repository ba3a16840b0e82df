// kidsdiy-core: view-state controllers and page logic between kidsdiy-api and consumers.

pub mod controller;
pub mod credential;
pub mod error;
pub mod gateway;
pub mod pages;
pub mod profile;
pub mod render;
pub mod search;
pub mod upload;
pub mod view_state;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use controller::{View, ViewController};
pub use credential::{
    ACCESS_COOKIE, AccessCookie, CookieCredentialStore, CredentialProvider, SameSite,
    StaticCredential,
};
pub use error::CoreError;
pub use gateway::{DEFAULT_TIMEOUT, Gateway, Proxy, TIMEOUT_MESSAGE};
pub use profile::ProfileUpdate;
pub use search::{Titled, filter_by_title};
pub use upload::{AfterPatch, MediaPipeline, PatchOutcome, PatchTarget};
pub use view_state::{ViewState, ViewStatus};
