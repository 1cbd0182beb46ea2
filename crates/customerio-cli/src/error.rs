//! CLI error types with miette diagnostics.
//!
//! Maps library errors into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use customerio_api::Error as ApiError;
use customerio_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach {url}")]
    #[diagnostic(
        code(cio::connection_failed),
        help("Check network access, or the *_url overrides in your config.")
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: ApiError,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(cio::timeout),
        help("Increase the timeout with --timeout or CUSTOMERIO_TIMEOUT_SECS.")
    )]
    Timeout {
        #[source]
        source: ApiError,
    },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(cio::auth_failed),
        help(
            "Verify the site ID and tracking key (Track API) or the App API key.\n\
             Run: cio auth region  to check which data center the keys belong to."
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured")]
    #[diagnostic(
        code(cio::no_credentials),
        help(
            "Set --site-id and --tracking-key, or --app-key.\n\
             Or set CUSTOMERIO_SITE_ID / CUSTOMERIO_TRACKING_API_KEY / CUSTOMERIO_APP_API_KEY,\n\
             or add them to {path}"
        )
    )]
    NoCredentials { path: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Not found: {message}")]
    #[diagnostic(code(cio::not_found))]
    NotFound { message: String },

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(cio::api_error))]
    Api { status: u16, message: String },

    #[error(transparent)]
    #[diagnostic(code(cio::client))]
    Client(ApiError),

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(cio::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(cio::config),
        help("Check the config file and CUSTOMERIO_* environment variables.")
    )]
    Config(ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(cio::json), help("Check the JSON argument or file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Library error → CliError mapping ─────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::MissingCredentials => CliError::NoCredentials {
                path: customerio_config::config_path().display().to_string(),
            },

            ApiError::Param { param } => CliError::Validation {
                field: param.into(),
                reason: "missing".into(),
            },

            ApiError::PayloadTooLarge { limit, size } => CliError::Validation {
                field: "data".into(),
                reason: format!("{size} bytes exceeds the {limit} byte limit"),
            },

            ApiError::AttachmentExists { name } => CliError::Validation {
                field: "attach".into(),
                reason: format!("duplicate attachment name '{name}'"),
            },

            ApiError::Transport(ref e) if e.is_timeout() => CliError::Timeout { source: err },

            ApiError::Transport(ref e) => CliError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "(unknown)".into(), ToString::to_string),
                source: err,
            },

            ApiError::Classified(ref classified) => {
                let message = classified.to_string();
                if err.is_auth_failure() {
                    CliError::AuthFailed { message }
                } else if err.is_not_found() {
                    CliError::NotFound { message }
                } else {
                    CliError::Api {
                        status: classified.status(),
                        message,
                    }
                }
            }

            other => CliError::Client(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Client(api) => api.into(),
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}
