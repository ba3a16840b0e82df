// ── Core error types ──
//
// Page-level errors. Consumers see a small set of outcomes rather than
// HTTP details: the `Display` of the upstream-derived variants is the
// bare message so a page renders `Error: <message>` unchanged.

use thiserror::Error;

use crate::view_state::ViewStatus;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Upstream outcomes ────────────────────────────────────────────
    /// Missing, expired or rejected bearer credential.
    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    NotFound { message: String },

    /// The backend could not be reached or answered with a gateway error.
    #[error("{message}")]
    UpstreamUnavailable { message: String },

    /// Any other failure, with the status the proxy reported.
    #[error("{message}")]
    Api { message: String, status: Option<u16> },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("cannot move view from {from} to {to}")]
    InvalidTransition { from: ViewStatus, to: ViewStatus },

    /// The upload stage failed, so the follow-up patch never ran.
    #[error("{message}")]
    UploadAborted { message: String },

    /// Reading or writing the persisted credential failed.
    #[error("Credential storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Classify a failed proxy answer by the status it carried.
    ///
    /// Under the collapsing status policy every failure arrives as 500
    /// and lands in [`CoreError::Api`].
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Unauthorized { message },
            404 => Self::NotFound { message },
            502..=504 => Self::UpstreamUnavailable { message },
            _ => Self::Api {
                message,
                status: Some(status),
            },
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Returns `true` if re-authenticating might fix this.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<kidsdiy_api::Error> for CoreError {
    fn from(err: kidsdiy_api::Error) -> Self {
        let message = err.envelope_message();
        match err {
            kidsdiy_api::Error::Authentication { .. } => CoreError::Unauthorized { message },
            kidsdiy_api::Error::Upstream { status, .. } => CoreError::from_status(status, message),
            kidsdiy_api::Error::Transport(_) | kidsdiy_api::Error::Timeout { .. } => {
                CoreError::UpstreamUnavailable { message }
            }
            kidsdiy_api::Error::MissingMediaReference => CoreError::UploadAborted { message },
            kidsdiy_api::Error::InvalidUrl(_)
            | kidsdiy_api::Error::Tls(_)
            | kidsdiy_api::Error::Deserialization { .. }
            | kidsdiy_api::Error::Io { .. } => CoreError::Internal(message),
        }
    }
}
