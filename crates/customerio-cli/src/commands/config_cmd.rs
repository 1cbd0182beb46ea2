//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let resolved = config::resolve(global)?;
            let rendered = resolved.to_redacted_toml()?;
            if !global.quiet {
                print!("{rendered}");
            }
            Ok(())
        }

        ConfigCommand::Path => {
            let path = global
                .config
                .clone()
                .unwrap_or_else(customerio_config::config_path);
            println!("{}", path.display());
            Ok(())
        }
    }
}
