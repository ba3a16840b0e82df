mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::Session;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli.command, &cli.global).await {
        let code = err.exit_code();
        match err {
            CliError::View { .. } => {
                eprintln!("{}", output::error_line(&err.to_string(), &cli.global.color));
            }
            err => eprintln!("{:?}", miette::Report::new(err)),
        }
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(command: Command, global: &cli::GlobalOpts) -> Result<(), CliError> {
    match command {
        // Config commands don't need a backend
        Command::Config(args) => commands::config_cmd::handle(args, global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "kidsdiy", &mut std::io::stdout());
            Ok(())
        }

        Command::Serve(args) => {
            let cfg = config::load_config_or_default();
            commands::serve::handle(args, &cfg, global).await
        }

        cmd => {
            let cfg = config::load_config_or_default();
            let session = Session::open(global, &cfg)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &session, &cfg, global).await
        }
    }
}
