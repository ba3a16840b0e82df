//! `kidsdiy serve`: the /proxy/* HTTP server.

use kidsdiy_api::StatusPolicy;

use crate::cli::{GlobalOpts, ServeArgs, StatusPolicyArg};
use crate::config::{self, Config};
use crate::error::CliError;

pub async fn handle(args: ServeArgs, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let mut client = config::resolve_client(global, config)?;
    if let Some(policy) = args.status_policy {
        client.status_policy = match policy {
            StatusPolicyArg::Collapse => StatusPolicy::Collapse,
            StatusPolicyArg::Preserve => StatusPolicy::Preserve,
        };
    }
    let listen = args.listen.unwrap_or(client.listen);

    if !global.quiet {
        eprintln!(
            "Proxying {} on http://{listen} (Ctrl+C to stop)",
            client.api_base_url
        );
    }
    kidsdiy_proxy::serve(listen, client.build_route()?).await?;
    Ok(())
}
