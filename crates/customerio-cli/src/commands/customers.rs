//! Customer command handlers.

use customerio_api::Client;

use crate::cli::{CustomersArgs, CustomersCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    client: &Client,
    args: CustomersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CustomersCommand::Update { id, data } => {
            let attributes = util::parse_object("data", &data)?;
            client.update_customer(&id, &attributes).await?;
            output::status(&format!("Customer '{id}' updated"), global.quiet);
            Ok(())
        }

        CustomersCommand::Delete { id } => {
            client.delete_customer(&id).await?;
            output::status(&format!("Customer '{id}' deleted"), global.quiet);
            Ok(())
        }
    }
}
