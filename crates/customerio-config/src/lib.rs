//! Layered configuration for Customer.io clients.
//!
//! Values come from built-in defaults, then a TOML file, then `CUSTOMERIO_*`
//! environment variables, later layers winning. [`Config::client_options`]
//! turns the result into the option list `customerio_api::ClientBuilder`
//! consumes, so callers can append their own overrides after it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use customerio_api::{Client, ClientBuilder, ClientOption, Region};

/// Prefix for environment variable overrides, e.g. `CUSTOMERIO_SITE_ID`.
pub const ENV_PREFIX: &str = "CUSTOMERIO_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error(transparent)]
    Client(#[from] customerio_api::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config ──────────────────────────────────────────────────────────

/// Settings for one Customer.io workspace.
///
/// Every field is optional in the file; unset fields fall back to the
/// client defaults.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Data center: `us` or `eu`.
    #[serde(default)]
    pub region: Region,

    /// Track API site ID.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub site_id: Option<String>,

    /// Track API key (paired with `site_id`).
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub tracking_api_key: Option<String>,

    /// App API bearer key.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub app_api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,

    #[serde(default)]
    pub request_tracing: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Overrides the region's Track API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_url: Option<String>,

    /// Overrides the region's App API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Overrides the region's Beta API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta_url: Option<String>,
}

/// Keys read from the environment verbatim rather than through figment's
/// typed value parsing, which would turn `00123` into `123`.
const CREDENTIAL_KEYS: [&str; 3] = ["site_id", "tracking_api_key", "app_api_key"];

#[derive(Default, Serialize)]
struct RawCredentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    site_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tracking_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_api_key: Option<String>,
}

impl RawCredentials {
    fn from_env() -> Self {
        let var = |key: &str| {
            std::env::var(format!("{ENV_PREFIX}{}", key.to_ascii_uppercase()))
                .ok()
                .filter(|v| !v.is_empty())
        };
        Self {
            site_id: var(CREDENTIAL_KEYS[0]),
            tracking_api_key: var(CREDENTIAL_KEYS[1]),
            app_api_key: var(CREDENTIAL_KEYS[2]),
        }
    }
}

// Unquoted numeric IDs in a hand-written file arrive as integers.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Signed(n) => n.to_string(),
        Raw::Unsigned(n) => n.to_string(),
    }))
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("region", &self.region)
            .field("site_id", &self.site_id)
            .field("tracking_api_key", &redact(self.tracking_api_key.as_deref()))
            .field("app_api_key", &redact(self.app_api_key.as_deref()))
            .field("timeout_secs", &self.timeout_secs)
            .field("retry_count", &self.retry_count)
            .field("request_tracing", &self.request_tracing)
            .field("user_agent", &self.user_agent)
            .field("tracking_url", &self.tracking_url)
            .field("api_url", &self.api_url)
            .field("beta_url", &self.beta_url)
            .finish()
    }
}

fn redact(secret: Option<&str>) -> Option<&'static str> {
    secret.map(|_| "[REDACTED]")
}

impl Config {
    /// The default layering: defaults, then `path` (or the standard config
    /// file), then `CUSTOMERIO_*` environment variables.
    pub fn figment(path: Option<&Path>) -> Figment {
        let path = path.map_or_else(config_path, Path::to_path_buf);
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&CREDENTIAL_KEYS))
            .merge(Serialized::defaults(RawCredentials::from_env()))
    }

    /// Load from the default layering and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment(path))
    }

    /// Extract from an arbitrary figment and validate.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Validation {
                field: "timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        for (field, value) in [
            ("tracking_url", &self.tracking_url),
            ("api_url", &self.api_url),
            ("beta_url", &self.beta_url),
        ] {
            if let Some(raw) = value {
                url::Url::parse(raw).map_err(|e| ConfigError::Validation {
                    field: field.into(),
                    reason: format!("{e}: {raw}"),
                })?;
            }
        }
        Ok(())
    }

    /// Convert to client options: region, then URL overrides, then the rest.
    pub fn client_options(&self) -> Vec<ClientOption> {
        let mut options = vec![ClientOption::Region(self.region)];

        if self.tracking_url.is_some() || self.api_url.is_some() || self.beta_url.is_some() {
            let base = self.region.endpoints();
            let pick = |custom: &Option<String>, fallback: &str| {
                custom.clone().unwrap_or_else(|| fallback.to_owned())
            };
            options.push(ClientOption::Endpoints {
                tracking: pick(&self.tracking_url, base.tracking),
                app: pick(&self.api_url, base.app),
                beta: pick(&self.beta_url, base.beta),
            });
        }

        if let Some(secs) = self.timeout_secs {
            options.push(ClientOption::HttpTimeout(Duration::from_secs(secs)));
        }
        if let Some(retries) = self.retry_count {
            options.push(ClientOption::RetryCount(retries));
        }
        if self.request_tracing {
            options.push(ClientOption::RequestTracing(true));
        }
        if let Some(agent) = &self.user_agent {
            options.push(ClientOption::UserAgent(agent.clone()));
        }
        if self.site_id.is_some() || self.tracking_api_key.is_some() {
            options.push(ClientOption::TrackingKey {
                site_id: self.site_id.clone().unwrap_or_default(),
                key: SecretString::from(self.tracking_api_key.clone().unwrap_or_default()),
            });
        }
        if let Some(key) = &self.app_api_key {
            options.push(ClientOption::AppKey(SecretString::from(key.clone())));
        }
        options
    }

    /// A builder pre-loaded with [`Config::client_options`].
    pub fn client_builder(&self) -> ClientBuilder {
        Client::builder().options(self.client_options())
    }

    /// Build a client straight from this configuration.
    pub fn client(&self) -> Result<Client, ConfigError> {
        Ok(self.client_builder().build()?)
    }

    /// Render as TOML with keys replaced by a placeholder.
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        for key in [&mut shown.tracking_api_key, &mut shown.app_api_key] {
            if key.is_some() {
                *key = Some("[REDACTED]".into());
            }
        }
        Ok(toml::to_string_pretty(&shown)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "customerio", "cio").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("cio");
    p
}
