//! Command dispatch: bridges CLI args -> client calls -> output.

pub mod auth;
pub mod collections;
pub mod config_cmd;
pub mod customers;
pub mod devices;
pub mod email;
pub mod events;
pub mod util;

use customerio_api::Client;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Auth(args) => auth::handle(client, args, global).await,
        Command::Customers(args) => customers::handle(client, args, global).await,
        Command::Devices(args) => devices::handle(client, args, global).await,
        Command::Events(args) => events::handle(client, args, global).await,
        Command::Email(args) => email::handle(client, args, global).await,
        Command::Collections(args) => collections::handle(client, args, global).await,
        // Config and Completions are handled before a client exists
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
