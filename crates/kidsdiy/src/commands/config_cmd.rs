//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking the password.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "api_base_url = \"{}\"", p.api_base_url);
        if let Some(ref media) = p.media_base_url {
            let _ = writeln!(out, "media_base_url = \"{media}\"");
        }
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        let _ = writeln!(out, "status_policy = \"{}\"", policy_name(p));
        if let Some(listen) = p.listen {
            let _ = writeln!(out, "listen = \"{listen}\"");
        }
    }

    out
}

fn policy_name(p: &Profile) -> &'static str {
    match p.status_policy {
        kidsdiy_api::StatusPolicy::Collapse => "collapse",
        kidsdiy_api::StatusPolicy::Preserve => "preserve",
    }
}

/// Same as the file, with the password masked, for structured output.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("****".into());
        }
    }
    cfg
}

fn invalid(field: &str, reason: impl Into<String>) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Apply `key = value` to a profile.
fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "api_base_url" | "api-base-url" | "api_url" | "api-url" => {
            url::Url::parse(&value).map_err(|_| invalid(key, format!("invalid URL: {value}")))?;
            profile.api_base_url = value;
        }
        "media_base_url" | "media-base-url" => {
            url::Url::parse(&value).map_err(|_| invalid(key, format!("invalid URL: {value}")))?;
            profile.media_base_url = Some(value);
        }
        "username" => profile.username = Some(value),
        "password" => profile.password = Some(value),
        "password_env" | "password-env" => profile.password_env = Some(value),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => {
            profile.insecure = Some(value.parse().map_err(|_| invalid("insecure", "must be 'true' or 'false'"))?);
        }
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| invalid("timeout", "must be a number (seconds)"))?);
        }
        "status_policy" | "status-policy" => {
            profile.status_policy = match value.as_str() {
                "collapse" => kidsdiy_api::StatusPolicy::Collapse,
                "preserve" => kidsdiy_api::StatusPolicy::Preserve,
                _ => return Err(invalid("status_policy", "must be 'collapse' or 'preserve'")),
            };
        }
        "listen" => {
            profile.listen = Some(value.parse().map_err(|_| invalid("listen", "must be host:port, e.g. 127.0.0.1:3000"))?);
        }
        other => {
            return Err(invalid(
                other,
                format!(
                    "unknown config key '{other}'. Valid keys: api_base_url, media_base_url, \
                     username, password, password_env, ca_cert, insecure, timeout, \
                     status_policy, listen"
                ),
            ));
        }
    }
    Ok(())
}

/// Keyring (`Some(None)`), plaintext (`Some(Some(pw))`) or skip (`None`).
fn prompt_password_storage(profile_name: &str) -> Result<Option<Option<String>>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
        "Don't store, ask at login",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(CliError::prompt)?;
    if selection == 2 {
        return Ok(None);
    }

    let password = rpassword::prompt_password("Password: ").map_err(CliError::prompt)?;
    if password.is_empty() {
        return Err(invalid("password", "password cannot be empty"));
    }
    if selection == 0 {
        kidsdiy_config::store_password(profile_name, &password)?;
        eprintln!("   ✓ Password stored in system keyring");
        Ok(Some(None))
    } else {
        Ok(Some(Some(password)))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, format_config_redacted, |c| {
                c.active_profile_name().to_owned()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg
                .profiles
                .entry(profile_name.clone())
                .or_insert_with(|| Profile::new(""));

            set_key(profile, &key, value)?;
            config::save_config(&cfg)?;
            util::note(global, &format!("✓ Set {key} on profile '{profile_name}'"));
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("✨ Kids DIY Platform: configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = config::load_config_or_default();

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(config::active_profile_name(global, &cfg))
        .interact_text()
        .map_err(CliError::prompt)?;

    if cfg.profiles.contains_key(&profile_name)
        && !util::confirm(&format!("Profile '{profile_name}' exists. Overwrite?"), global.yes)?
    {
        return Ok(());
    }

    let api_base_url: String = Input::new()
        .with_prompt("Backend URL")
        .default("http://127.0.0.1:8000".into())
        .validate_with(|raw: &String| url::Url::parse(raw).map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()
        .map_err(CliError::prompt)?;

    let username: String = Input::new()
        .with_prompt("Username (blank to skip)")
        .allow_empty(true)
        .interact_text()
        .map_err(CliError::prompt)?;

    let mut profile = Profile::new(api_base_url);
    if !username.is_empty() {
        profile.username = Some(username);
        if let Some(plaintext) = prompt_password_storage(&profile_name)? {
            profile.password = plaintext;
        }
    }

    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    let written = config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", written.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Next: kidsdiy login");
    Ok(())
}
