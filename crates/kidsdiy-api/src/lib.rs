// kidsdiy-api: async client and envelope proxy for the Kids DIY Platform backend

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod models;
pub mod proxy;
pub mod request;
pub mod transport;

mod account;
mod chat;
mod media;
mod posts;

pub use auth::{BearerToken, LoginCredentials};
pub use client::UpstreamClient;
pub use endpoints::ProxyEndpoint;
pub use envelope::Envelope;
pub use error::Error;
pub use proxy::{DEFAULT_FAILURE_MESSAGE, ProxyResponse, ProxyRoute, StatusPolicy};
pub use request::{MediaFile, ProxyBody, ProxyMethod, ProxyRequest, UPLOAD_FIELD};
pub use transport::{TlsMode, TransportConfig};
