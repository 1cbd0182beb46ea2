//! Auth command handlers.

use customerio_api::Client;

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(client: &Client, args: AuthArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        AuthCommand::Test => {
            client.test_auth().await?;
            output::status("Tracking credentials accepted", global.quiet);
            Ok(())
        }

        AuthCommand::Region => {
            let region = client.find_region().await?;
            output::print_json(&region, global.quiet)
        }
    }
}
