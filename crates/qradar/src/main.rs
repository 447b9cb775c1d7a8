mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use qradar_api::QRadarClient;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
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

async fn run(mut cli: Cli) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    if cli.global.output.is_none() {
        cli.global.output = config::default_output(&cfg);
    }

    match cli.command {
        // Config commands don't need a console connection
        Command::Config(args) => commands::config_cmd::handle(&args, &cli.global, cfg),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "qradar", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let client_config = config::resolve_client_config(&cli.global, &cfg)?;
            let client = QRadarClient::new(&client_config)?;

            tracing::debug!(command = ?cmd, console = %client_config.console, "dispatching command");
            commands::dispatch(cmd, &client, &cli.global).await
        }
    }
}
