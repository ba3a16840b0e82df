//! Login, signup, logout.

use dialoguer::Input;
use kidsdiy_api::LoginCredentials;
use kidsdiy_api::models::SignupRequest;
use kidsdiy_core::pages::{LoginFlow, SignupFlow, logout};
use secrecy::SecretString;

use crate::cli::{GlobalOpts, LoginArgs, SignupArgs};
use crate::config::{Config, Session};
use crate::error::CliError;

use super::util;

pub async fn login(
    session: &Session,
    config: &Config,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let profile = config.profiles.get(&session.profile);

    let username = match args.username.or_else(|| profile.and_then(|p| p.username.clone())) {
        Some(username) => username,
        None => Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(CliError::prompt)?,
    };

    let password = match (args.password, profile) {
        (Some(password), _) => SecretString::from(password),
        (None, Some(profile)) => match kidsdiy_config::resolve_password(profile, &session.profile) {
            Ok(password) => password,
            Err(_) => prompt_password("Password: ")?,
        },
        (None, None) => prompt_password("Password: ")?,
    };

    let flow = LoginFlow::new(session.gateway.clone(), session.store.clone());
    let pb = util::spinner("Logging in", global.quiet);
    let result = flow.submit(&LoginCredentials::new(username.clone(), password)).await;
    pb.finish_and_clear();

    let redirect = result?;
    util::note(global, &format!("✓ Logged in as {username} (profile '{}')", session.profile));
    tracing::debug!(to = redirect.path(), "login redirect");
    Ok(())
}

pub async fn signup(session: &Session, args: SignupArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let password = match args.password {
        Some(password) => password,
        None => {
            let first = rpassword::prompt_password("Password: ").map_err(CliError::prompt)?;
            let again = rpassword::prompt_password("Repeat password: ").map_err(CliError::prompt)?;
            if first != again {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "passwords do not match".into(),
                });
            }
            first
        }
    };

    let request = SignupRequest {
        username: args.username,
        email: args.email,
        first_name: args.first_name,
        last_name: args.last_name,
        password,
    };

    let pb = util::spinner("Creating account", global.quiet);
    let result = SignupFlow::new(session.gateway.clone()).submit(&request).await;
    pb.finish_and_clear();

    result?;
    util::note(
        global,
        &format!("✓ Account '{}' created. Log in with: kidsdiy login", request.username),
    );
    Ok(())
}

pub fn logout_cmd(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    logout(&session.store)?;
    util::note(global, &format!("✓ Logged out of profile '{}'", session.profile));
    Ok(())
}

fn prompt_password(prompt: &str) -> Result<SecretString, CliError> {
    let password = rpassword::prompt_password(prompt).map_err(CliError::prompt)?;
    Ok(SecretString::from(password))
}
