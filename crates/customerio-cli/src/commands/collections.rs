//! Collection command handlers.

use customerio_api::Client;

use crate::cli::{CollectionsArgs, CollectionsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    client: &Client,
    args: CollectionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CollectionsCommand::Update {
            name,
            id,
            data_file,
            url,
        } => {
            // clap guarantees exactly one of --data-file / --url.
            if let Some(path) = data_file {
                let rows: Vec<serde_json::Value> = serde_json::from_slice(&util::read_input(&path)?)?;
                client.update_collection(id.as_deref(), &name, &rows).await?;
                output::status(
                    &format!("Collection '{name}' written ({} rows)", rows.len()),
                    global.quiet,
                );
            } else if let Some(url) = url {
                client
                    .update_collection_via_url(id.as_deref(), &name, &url)
                    .await?;
                output::status(&format!("Collection '{name}' written from {url}"), global.quiet);
            }
            Ok(())
        }
    }
}
