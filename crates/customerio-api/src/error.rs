use bytes::Bytes;
use thiserror::Error;

/// Top-level error type for the `customerio-api` crate.
///
/// Covers every failure mode across the three API surfaces: client
/// construction, parameter validation, transport, payload encoding, and
/// classified upstream errors. Callers branch on the variant; the CLI maps
/// them to exit codes.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// Neither tracking credentials nor an App API key were supplied.
    #[error("missing an API key (tracking site ID + key, or App API key)")]
    MissingCredentials,

    /// A configured value cannot be used (e.g. a key that is not a valid header value).
    #[error("invalid client configuration: {message}")]
    Config { message: String },

    // ── Parameters ──────────────────────────────────────────────────
    /// A required endpoint parameter was empty or absent.
    #[error("{param}: missing")]
    Param { param: &'static str },

    /// Event data exceeded the size accepted by the Track API.
    #[error("event body size limited to {limit} bytes (got {size})")]
    PayloadTooLarge { limit: usize, size: usize },

    /// An email attachment with the same name was already added.
    #[error("attachment with this name already exists: {name}")]
    AttachmentExists { name: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Reading local input (attachments) failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ── Data ────────────────────────────────────────────────────────
    /// Request payload could not be encoded as JSON.
    #[error("failed to serialize request payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A successful response body could not be decoded, with the raw body for debugging.
    #[error("deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── API ─────────────────────────────────────────────────────────
    /// A response was received but its status did not match the expected one.
    #[error(transparent)]
    Classified(#[from] ClassifiedError),
}

impl Error {
    /// HTTP status of a classified upstream error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Classified(err) => Some(err.status()),
            _ => None,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Classified(err) => err.status() == 429 || err.status() >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the upstream rejected the credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Error produced by inspecting a response whose status did not match the
/// caller's expectation.
///
/// The transactional email endpoint answers with `{"meta":{"error":"..."}}`;
/// every other endpoint returns an arbitrary body that is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifiedError {
    /// Any endpoint other than transactional email.
    #[error("{status}: {url} {}", render_body(.body))]
    Api { status: u16, url: String, body: Bytes },

    /// Failure from the transactional email endpoint.
    #[error("{message}")]
    Transactional { status: u16, message: String },
}

impl ClassifiedError {
    pub fn status(&self) -> u16 {
        match self {
            Self::Api { status, .. } | Self::Transactional { status, .. } => *status,
        }
    }
}

/// Render an upstream body for display.
///
/// JSON-shaped bodies are re-escaped as a JSON string literal (minus the
/// outer quotes) so embedded quotes and newlines stay on one line.
fn render_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if !text.contains('{') {
        return text.into_owned();
    }
    match serde_json::to_string(text.as_ref()) {
        Ok(quoted) => quoted
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .map_or_else(|| quoted.clone(), str::to_owned),
        Err(_) => text.into_owned(),
    }
}
