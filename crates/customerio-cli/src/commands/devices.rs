//! Device command handlers.

use chrono::Utc;
use customerio_api::{Client, Device};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(client: &Client, args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::Update {
            customer,
            device_id,
            platform,
            last_used,
        } => {
            let device = Device {
                id: device_id,
                last_used: last_used.unwrap_or_else(|| Utc::now().timestamp()),
                platform,
            };
            client.update_device(&customer, &device).await?;
            output::status(
                &format!("Device registered for customer '{customer}'"),
                global.quiet,
            );
            Ok(())
        }

        DevicesCommand::Delete {
            customer,
            device_id,
        } => {
            client.delete_device(&customer, &device_id).await?;
            output::status(
                &format!("Device removed from customer '{customer}'"),
                global.quiet,
            );
            Ok(())
        }
    }
}
