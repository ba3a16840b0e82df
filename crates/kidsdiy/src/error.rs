//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use kidsdiy_config::ConfigError;
use kidsdiy_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Pages ────────────────────────────────────────────────────────
    /// A page settled in its error state. Printed as the bare
    /// `Error: <message>` line, without a diagnostic frame.
    #[error("Error: {message}")]
    #[diagnostic(code(kidsdiy::view))]
    View { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(kidsdiy::auth_failed),
        help("Log in again with: kidsdiy login")
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(kidsdiy::no_credentials),
        help(
            "Pass --password, set password_env in the profile,\n\
             or store one with: kidsdiy config init"
        )
    )]
    NoCredentials { profile: String },

    // ── Backend ──────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(kidsdiy::not_found))]
    NotFound { message: String },

    #[error("Could not reach the backend: {message}")]
    #[diagnostic(
        code(kidsdiy::connection_failed),
        help("Check that the backend is running and api_base_url is correct.")
    )]
    ConnectionFailed { message: String },

    #[error("{message}")]
    #[diagnostic(code(kidsdiy::api_error))]
    Api { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(kidsdiy::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(kidsdiy::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: kidsdiy config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(kidsdiy::no_config),
        help(
            "Create a profile with: kidsdiy config init\n\
             or pass --api-url. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(kidsdiy::config))]
    Config(ConfigError),

    // ── Server ───────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(kidsdiy::serve))]
    Serve(#[from] kidsdiy_proxy::ServeError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub(crate) fn prompt(err: impl std::fmt::Display) -> Self {
        Self::Validation {
            field: "interactive".into(),
            reason: format!("prompt failed: {err}"),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            other => Self::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unauthorized { message } => Self::AuthFailed { message },
            CoreError::NotFound { message } => Self::NotFound { message },
            CoreError::UpstreamUnavailable { message } => Self::ConnectionFailed { message },
            CoreError::Validation { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            other => Self::Api {
                message: other.to_string(),
            },
        }
    }
}
