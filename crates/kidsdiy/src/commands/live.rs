//! Live classes.

use kidsdiy_core::ViewController;
use kidsdiy_core::pages::{LiveView, SessionCard};
use tabled::Tabled;

use crate::cli::{GlobalOpts, LiveArgs, LiveCommand};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Starts")]
    starts: String,
    #[tabled(rename = "Ends")]
    ends: String,
    #[tabled(rename = "")]
    live: &'static str,
}

impl From<&SessionCard> for SessionRow {
    fn from(s: &SessionCard) -> Self {
        Self {
            id: s.id,
            title: s.title.clone(),
            host: s.host_name.clone(),
            starts: s.starts.clone(),
            ends: s.ends.clone().unwrap_or_default(),
            live: output::live_badge(s.live),
        }
    }
}

pub async fn handle(session: &Session, args: LiveArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let page = ViewController::new(session.gateway.clone(), LiveView);
    let sessions = util::load(&page, "Loading live classes", global).await?;

    match args.command.unwrap_or(LiveCommand::List) {
        LiveCommand::List => {
            let out = output::render_list(&global.output, &sessions, |s| SessionRow::from(s), |s| {
                s.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LiveCommand::Join { id } => {
            let channel = page.join(id).ok_or_else(|| CliError::NotFound {
                message: format!("live class {id} not found. Run: kidsdiy live"),
            })?;
            output::print_output(&channel, global.quiet);
            Ok(())
        }
    }
}
