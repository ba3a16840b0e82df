//! Shared helpers for command handlers.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use kidsdiy_core::{Proxy, View, ViewController, ViewStatus};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Spinner on stderr while a page loads; hidden under `--quiet`.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Mount `page` and hand back its payload once ready.
///
/// An error state comes back as [`CliError::View`] carrying the page's
/// message.
pub async fn load<P: Proxy, V: View>(
    page: &ViewController<P, V>,
    label: &str,
    global: &GlobalOpts,
) -> Result<V::Payload, CliError> {
    let pb = spinner(label, global.quiet);
    let result = page.mount().await;
    pb.finish_and_clear();
    result?;
    settled(page)
}

/// The ready payload, or the page's error message.
pub fn settled<P: Proxy, V: View>(page: &ViewController<P, V>) -> Result<V::Payload, CliError> {
    let state = page.state();
    match (state.status, state.payload) {
        (ViewStatus::Ready, Some(payload)) => Ok(payload),
        (_, _) => Err(CliError::View {
            message: state.message.unwrap_or_else(|| format!("page is {}", state.status)),
        }),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(CliError::prompt)
}

/// Print a status line to stderr unless `--quiet`.
pub fn note(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{message}");
    }
}
