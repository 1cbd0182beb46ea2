//! Event command handlers.

use customerio_api::Client;

use crate::cli::{EventsArgs, EventsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(client: &Client, args: EventsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        EventsCommand::Send {
            name,
            customer,
            anonymous: _,
            data,
            timestamp,
        } => {
            let data = util::parse_object("data", &data)?;
            let timestamp = util::parse_timestamp("timestamp", timestamp)?;

            // clap guarantees exactly one of --customer / --anonymous.
            match customer {
                Some(customer) => {
                    client.new_event(&customer, &name, timestamp, &data).await?;
                    output::status(
                        &format!("Event '{name}' recorded for customer '{customer}'"),
                        global.quiet,
                    );
                }
                None => {
                    client.new_anonymous_event(&name, timestamp, &data).await?;
                    output::status(&format!("Anonymous event '{name}' recorded"), global.quiet);
                }
            }
            Ok(())
        }
    }
}
