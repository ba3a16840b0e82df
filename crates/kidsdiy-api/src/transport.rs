// HTTP transport settings for the upstream backend.
//
// One `reqwest::Client` per `UpstreamClient`; the proxy route and the typed
// methods share it, so TLS and the per-call deadline are set once here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("kidsdiy/", env!("CARGO_PKG_VERSION"));

/// How the backend's certificate is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    #[default]
    System,
    /// Trust an extra PEM root, e.g. a school's internal CA.
    CustomCa(PathBuf),
    /// Self-signed development backends only.
    DangerAcceptInvalid,
}

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Deadline for one upstream call, connect through body.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT);

        let builder = match self.tls {
            TlsMode::System => builder,
            TlsMode::CustomCa(ref path) => builder.add_root_certificate(read_root(path)?),
            TlsMode::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        };

        builder
            .build()
            .map_err(|e| Error::Tls(format!("cannot build HTTP client: {e}")))
    }
}

fn read_root(path: &Path) -> Result<reqwest::Certificate, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("cannot read CA certificate {}: {e}", path.display())))?;
    reqwest::Certificate::from_pem(&pem)
        .map_err(|e| Error::Tls(format!("{} is not a PEM certificate: {e}", path.display())))
}
