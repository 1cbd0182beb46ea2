// Client configuration: immutable resolved options plus the builder that
// produces them.
//
// Options are applied in the order given and the last write to a field wins,
// so callers can layer defaults, file config, and overrides without
// restating every field.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::client::Client;
use crate::error::Error;
use crate::region::{Endpoints, Region};

/// Default timeout applied to every request.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(20);

/// Default number of retries after a transport-level failure.
pub const DEFAULT_RETRY_COUNT: u32 = 2;

/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = concat!("customerio-api: v", env!("CARGO_PKG_VERSION"));

/// Resolved, read-only client settings.
///
/// Built once by [`ClientBuilder`] and shared (behind an `Arc`) by every
/// request the client makes.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    tracking_url: String,
    app_url: String,
    beta_url: String,
    site_id: String,
    tracking_key: SecretString,
    app_key: SecretString,
    http_timeout: Duration,
    retry_count: u32,
    request_tracing: bool,
    user_agent: String,
}

impl ClientConfig {
    /// Start a builder seeded with the defaults.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    fn defaults() -> Self {
        let us = Region::Us.endpoints();
        Self {
            tracking_url: us.tracking.to_owned(),
            app_url: us.app.to_owned(),
            beta_url: us.beta.to_owned(),
            site_id: String::new(),
            tracking_key: SecretString::from(String::new()),
            app_key: SecretString::from(String::new()),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            retry_count: DEFAULT_RETRY_COUNT,
            request_tracing: false,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Track API base URL (no trailing slash).
    pub fn tracking_url(&self) -> &str {
        &self.tracking_url
    }

    /// App API base URL (no trailing slash).
    pub fn app_url(&self) -> &str {
        &self.app_url
    }

    /// Beta API base URL (no trailing slash).
    pub fn beta_url(&self) -> &str {
        &self.beta_url
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn tracking_key(&self) -> &SecretString {
        &self.tracking_key
    }

    pub fn app_key(&self) -> &SecretString {
        &self.app_key
    }

    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn request_tracing(&self) -> bool {
        self.request_tracing
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Both halves of the tracking credential pair are present.
    pub fn has_tracking_credentials(&self) -> bool {
        !self.site_id.is_empty() && !self.tracking_key.expose_secret().is_empty()
    }

    pub fn has_app_key(&self) -> bool {
        !self.app_key.expose_secret().is_empty()
    }

    fn apply(&mut self, option: ClientOption) {
        match option {
            ClientOption::Region(region) => self.set_endpoints(region.endpoints()),
            ClientOption::Endpoints { tracking, app, beta } => self.set_endpoints(Endpoints {
                tracking: &tracking,
                app: &app,
                beta: &beta,
            }),
            ClientOption::HttpTimeout(timeout) => self.http_timeout = timeout,
            ClientOption::RequestTracing(enabled) => self.request_tracing = enabled,
            ClientOption::RetryCount(retries) => self.retry_count = retries,
            ClientOption::UserAgent(agent) => self.user_agent = agent,
            ClientOption::TrackingKey { site_id, key } => {
                self.site_id = site_id;
                self.tracking_key = key;
            }
            ClientOption::AppKey(key) => self.app_key = key,
        }
    }

    // All three move together so a region switch never leaves a mixed set.
    fn set_endpoints(&mut self, endpoints: Endpoints<'_>) {
        self.tracking_url = endpoints.tracking.trim_end_matches('/').to_owned();
        self.app_url = endpoints.app.trim_end_matches('/').to_owned();
        self.beta_url = endpoints.beta.trim_end_matches('/').to_owned();
    }

    fn validate(&self) -> Result<(), Error> {
        if self.has_tracking_credentials() || self.has_app_key() {
            Ok(())
        } else {
            Err(Error::MissingCredentials)
        }
    }
}

/// A single named configuration mutator.
///
/// Useful when options come from somewhere other than code (a config file,
/// CLI flags) and need to be collected before the client is built.
#[derive(Debug, Clone)]
pub enum ClientOption {
    /// Switch all three base URLs to a region's hosts.
    Region(Region),
    /// Point every surface at explicit base URLs (proxies, test servers).
    Endpoints {
        tracking: String,
        app: String,
        beta: String,
    },
    HttpTimeout(Duration),
    RequestTracing(bool),
    RetryCount(u32),
    UserAgent(String),
    /// Site ID + Tracking API key for the Track API.
    TrackingKey { site_id: String, key: SecretString },
    /// App API key for the App and Beta APIs.
    AppKey(SecretString),
}

/// Builder for [`Client`] and [`ClientConfig`].
///
/// ```no_run
/// use customerio_api::{Client, Region};
///
/// # fn demo() -> Result<(), customerio_api::Error> {
/// let client = Client::builder()
///     .region(Region::Eu)
///     .tracking_key("site-id", "tracking-key")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    config: ClientConfig,
    http: Option<reqwest::Client>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::defaults(),
            http: None,
        }
    }

    /// Apply one option on top of everything applied so far.
    pub fn option(mut self, option: ClientOption) -> Self {
        self.config.apply(option);
        self
    }

    /// Apply options in iteration order.
    pub fn options(mut self, options: impl IntoIterator<Item = ClientOption>) -> Self {
        for option in options {
            self.config.apply(option);
        }
        self
    }

    pub fn region(self, region: Region) -> Self {
        self.option(ClientOption::Region(region))
    }

    pub fn endpoints(
        self,
        tracking: impl Into<String>,
        app: impl Into<String>,
        beta: impl Into<String>,
    ) -> Self {
        self.option(ClientOption::Endpoints {
            tracking: tracking.into(),
            app: app.into(),
            beta: beta.into(),
        })
    }

    pub fn http_timeout(self, timeout: Duration) -> Self {
        self.option(ClientOption::HttpTimeout(timeout))
    }

    /// Capture per-request timing on successful responses.
    pub fn request_tracing(self) -> Self {
        self.option(ClientOption::RequestTracing(true))
    }

    pub fn retry_count(self, retries: u32) -> Self {
        self.option(ClientOption::RetryCount(retries))
    }

    pub fn user_agent(self, agent: impl Into<String>) -> Self {
        self.option(ClientOption::UserAgent(agent.into()))
    }

    pub fn tracking_key(self, site_id: impl Into<String>, key: impl Into<String>) -> Self {
        self.option(ClientOption::TrackingKey {
            site_id: site_id.into(),
            key: SecretString::from(key.into()),
        })
    }

    pub fn app_key(self, key: impl Into<String>) -> Self {
        self.option(ClientOption::AppKey(SecretString::from(key.into())))
    }

    /// Use a pre-built `reqwest::Client` instead of one built from the
    /// config. Timeout and retry policy are still applied per request.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Validate and return the resolved configuration.
    pub fn build_config(&self) -> Result<ClientConfig, Error> {
        self.config.validate()?;
        Ok(self.config.clone())
    }

    /// Validate the configuration and construct the client.
    pub fn build(self) -> Result<Client, Error> {
        self.config.validate()?;
        Client::from_parts(self.config, self.http)
    }
}
