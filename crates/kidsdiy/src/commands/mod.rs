//! Command dispatch: CLI args -> pages -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod feed;
pub mod live;
pub mod profile;
pub mod resources;
pub mod serve;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::{Config, Session};
use crate::error::CliError;

/// Dispatch a backend-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    session: &Session,
    config: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(session, config, args, global).await,
        Command::Signup(args) => auth::signup(session, args, global).await,
        Command::Logout => auth::logout_cmd(session, global),
        Command::Feed => feed::handle(session, global).await,
        Command::Live(args) => live::handle(session, args, global).await,
        Command::Profile(args) => profile::handle(session, args, global).await,
        Command::Resources(args) => resources::handle(session, args, global).await,
        // Handled before a session is opened
        Command::Serve(_) | Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
