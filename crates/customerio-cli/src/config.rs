//! Resolve the effective configuration: file and environment first, then
//! global flags on top.

use customerio_api::Client;
use customerio_config::Config;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load the config layers and apply flag overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut config = Config::load(global.config.as_deref())?;
    apply_flags(&mut config, global);
    Ok(config)
}

fn apply_flags(config: &mut Config, global: &GlobalOpts) {
    if let Some(region) = global.region {
        config.region = region;
    }
    if let Some(ref site_id) = global.site_id {
        config.site_id = Some(site_id.clone());
    }
    if let Some(ref key) = global.tracking_key {
        config.tracking_api_key = Some(key.clone());
    }
    if let Some(ref key) = global.app_key {
        config.app_api_key = Some(key.clone());
    }
    if let Some(secs) = global.timeout {
        config.timeout_secs = Some(secs);
    }
    if let Some(retries) = global.retries {
        config.retry_count = Some(retries);
    }
    if global.trace {
        config.request_tracing = true;
    }
}

/// Build the API client for a command.
pub fn client(global: &GlobalOpts) -> Result<Client, CliError> {
    let config = resolve(global)?;
    tracing::debug!(?config, "resolved configuration");
    Ok(config.client()?)
}
