//! Transactional email command handlers.

use std::fs::File;

use customerio_api::{Client, EmailRequest};

use crate::cli::{EmailArgs, EmailCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(client: &Client, args: EmailArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        EmailCommand::Send { file, attach } => {
            let raw = util::read_input(&file)?;
            let mut request: EmailRequest = serde_json::from_slice(&raw)?;

            for path in &attach {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(|| CliError::Validation {
                        field: "attach".into(),
                        reason: format!("'{}' has no file name", path.display()),
                    })?;
                request.attach(name, File::open(path)?)?;
            }

            let response = client.send_email(&request).await?;
            output::print_json(&response, global.quiet)
        }
    }
}
