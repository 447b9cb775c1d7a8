//! Command handlers, one module per resource.

pub mod config_cmd;
pub mod offenses;
pub mod source_addresses;

use qradar_api::QRadarClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a console-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    client: &QRadarClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Offenses(args) => offenses::handle(client, args, global).await,
        Command::SourceAddresses(args) => source_addresses::handle(client, args, global).await,
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
