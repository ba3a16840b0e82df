// kidsdiy-proxy: `/proxy/*` HTTP routes in front of the platform backend.
//
// Every route forwards through a shared `ProxyRoute` and answers with the
// `{data, error}` envelope. The caller's `Authorization: Bearer` header
// is passed through unchanged.

pub mod error;
pub mod extract;
pub mod routes;
pub mod server;

pub use error::{ProxyError, ServeError};
pub use extract::{Bearer, RecordId};
pub use routes::{AppState, router};
pub use server::{serve, shutdown_signal};
