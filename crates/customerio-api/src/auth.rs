use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};

use crate::config::ClientConfig;

/// Which authentication scheme a request uses.
///
/// Marker enum (no data), handy for logging without touching secrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// Site ID + tracking key (Track API).
    Basic,
    /// App API key (App and Beta APIs).
    Bearer,
}

/// A ready-to-send `Authorization` credential.
#[derive(Debug, Clone)]
pub enum AuthHeader {
    /// Base64 of `site_id:tracking_key`.
    Basic(SecretString),
    /// The App API key as-is.
    Bearer(SecretString),
}

impl AuthHeader {
    pub fn scheme(&self) -> AuthScheme {
        match self {
            Self::Basic(_) => AuthScheme::Basic,
            Self::Bearer(_) => AuthScheme::Bearer,
        }
    }

    /// The full header value, e.g. `Basic c2l0ZTprZXk=`.
    pub fn value(&self) -> SecretString {
        let value = match self {
            Self::Basic(token) => format!("Basic {}", token.expose_secret()),
            Self::Bearer(key) => format!("Bearer {}", key.expose_secret()),
        };
        SecretString::from(value)
    }

    /// Header value flagged as sensitive so it is redacted from debug output.
    pub(crate) fn to_header_value(&self) -> Result<HeaderValue, reqwest::header::InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(self.value().expose_secret())?;
        value.set_sensitive(true);
        Ok(value)
    }
}

/// Pick the credential for a target URL.
///
/// URLs containing the configured tracking base URL get Basic auth; every
/// other URL (App, Beta, or anything unrecognised) gets the Bearer key.
/// Matching is a plain substring test against the configured base, so a
/// tracking base that is itself a substring of another surface's URL would
/// send that surface Basic auth.
pub fn select_auth(config: &ClientConfig, target_url: &str) -> AuthHeader {
    if target_url.contains(config.tracking_url()) {
        AuthHeader::Basic(basic_token(config))
    } else {
        AuthHeader::Bearer(config.app_key().clone())
    }
}

fn basic_token(config: &ClientConfig) -> SecretString {
    let pair = format!(
        "{}:{}",
        config.site_id(),
        config.tracking_key().expose_secret()
    );
    SecretString::from(STANDARD.encode(pair))
}
