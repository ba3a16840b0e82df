//! CLI configuration: thin wrapper around `kidsdiy_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--api-url,
//! --insecure, --timeout) and builds the gateway every page shares.

use std::sync::Arc;
use std::time::Duration;

use kidsdiy_api::{BearerToken, ProxyRoute, TlsMode};
use kidsdiy_core::{CookieCredentialStore, CredentialProvider, Gateway, StaticCredential};
use url::Url;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use kidsdiy_config::{
    ClientConfig, Config, Profile, config_path, cookie_path, load_config_or_default,
    profile_to_client_config, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Profile + flags → `ClientConfig`. Flags win over profile values.
///
/// Without a matching profile, `--api-url` alone is enough; an explicitly
/// requested profile that doesn't exist is an error.
pub fn resolve_client(global: &GlobalOpts, config: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, config);

    let mut client = match config.profiles.get(&profile_name) {
        Some(profile) => profile_to_client_config(profile, &config.defaults)?,
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(config),
            });
        }
        None => {
            let raw = global.api_url.as_deref().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            let mut client = ClientConfig::new(parse_url(raw)?);
            client.transport.timeout = Duration::from_secs(config.defaults.timeout);
            client
        }
    };

    if let Some(ref raw) = global.api_url {
        let url = parse_url(raw)?;
        if client.media_base_url == client.api_base_url {
            client.media_base_url = url.clone();
        }
        client.api_base_url = url;
    }
    if global.insecure {
        client.transport.tls = TlsMode::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        client.transport.timeout = Duration::from_secs(secs);
    }

    Ok(client)
}

fn parse_url(raw: &str) -> Result<Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "api-url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

// ── Session ─────────────────────────────────────────────────────────

/// Everything a command needs to talk to the backend.
pub struct Session {
    pub profile: String,
    pub client: ClientConfig,
    pub store: Arc<CookieCredentialStore>,
    pub gateway: Gateway<ProxyRoute>,
}

impl Session {
    /// Build the route and gateway for the active profile.
    ///
    /// Calls carry `--token` when given, otherwise the profile's stored
    /// login cookie.
    pub fn open(global: &GlobalOpts, config: &Config) -> Result<Self, CliError> {
        let profile = active_profile_name(global, config);
        let client = resolve_client(global, config)?;
        let route = client.build_route()?;

        let store = Arc::new(CookieCredentialStore::open(cookie_path(&profile))?);
        let credentials: Arc<dyn CredentialProvider> = match global.token {
            Some(ref token) => Arc::new(StaticCredential::new(Some(BearerToken::new(token.clone())))),
            None => store.clone(),
        };

        let gateway = Gateway::new(Arc::new(route), credentials).with_timeout(client.timeout());
        tracing::debug!(%profile, api = %client.api_base_url, "session opened");

        Ok(Self {
            profile,
            client,
            store,
            gateway,
        })
    }

    pub fn media_base(&self) -> Url {
        self.client.media_base_url.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["kidsdiy"];
        argv.extend_from_slice(args);
        argv.push("feed");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(name: &str, profile: Profile) -> Config {
        let mut cfg = Config::default();
        cfg.default_profile = Some(name.into());
        cfg.profiles.insert(name.into(), profile);
        cfg
    }

    #[test]
    fn flags_override_profile() {
        let mut profile = Profile::new("http://profile.test:8000");
        profile.timeout = Some(5);
        let cfg = config_with("home", profile);

        let client = resolve_client(
            &global(&["--api-url", "http://flag.test:9000", "--timeout", "7", "-k"]),
            &cfg,
        )
        .unwrap();
        assert_eq!(client.api_base_url.as_str(), "http://flag.test:9000/");
        assert_eq!(client.media_base_url.as_str(), "http://flag.test:9000/");
        assert_eq!(client.timeout(), Duration::from_secs(7));
        assert!(matches!(client.transport.tls, TlsMode::DangerAcceptInvalid));
    }

    #[test]
    fn profile_values_without_flags() {
        let mut profile = Profile::new("http://profile.test:8000");
        profile.timeout = Some(5);
        let cfg = config_with("home", profile);

        let client = resolve_client(&global(&[]), &cfg).unwrap();
        assert_eq!(client.api_base_url.as_str(), "http://profile.test:8000/");
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn api_url_alone_is_enough() {
        let client = resolve_client(&global(&["--api-url", "http://bare.test"]), &Config::default())
            .unwrap();
        assert_eq!(client.api_base_url.as_str(), "http://bare.test/");
    }

    #[test]
    fn nothing_configured_is_no_config() {
        let err = resolve_client(&global(&[]), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn unknown_explicit_profile_lists_available() {
        let cfg = config_with("home", Profile::new("http://profile.test"));
        let err = resolve_client(&global(&["--profile", "school"]), &cfg).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "school");
                assert_eq!(available, "home");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
