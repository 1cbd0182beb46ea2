//! Clap derive structures for the `cio` CLI.
//!
//! Defines the command tree and the global flags that override the loaded
//! configuration.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

use customerio_api::{DevicePlatform, Region};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cio -- command-line client for Customer.io
#[derive(Debug, Parser)]
#[command(
    name = "cio",
    version,
    about = "Send data to Customer.io from the command line",
    long_about = "Talks to the Customer.io Track API (customers, devices, events),\n\
        the App API (transactional email), and the Beta API (collections).\n\n\
        Credentials come from the config file, CUSTOMERIO_* environment\n\
        variables, or flags, in increasing order of precedence.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config dir)
    #[arg(long, env = "CUSTOMERIO_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Data center: us or eu
    #[arg(long, short = 'r', env = "CUSTOMERIO_REGION", global = true)]
    pub region: Option<Region>,

    /// Track API site ID
    #[arg(long, env = "CUSTOMERIO_SITE_ID", global = true)]
    pub site_id: Option<String>,

    /// Track API key
    #[arg(
        long,
        env = "CUSTOMERIO_TRACKING_API_KEY",
        global = true,
        hide_env_values = true
    )]
    pub tracking_key: Option<String>,

    /// App API key
    #[arg(
        long,
        env = "CUSTOMERIO_APP_API_KEY",
        global = true,
        hide_env_values = true
    )]
    pub app_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "CUSTOMERIO_TIMEOUT_SECS", global = true)]
    pub timeout: Option<u64>,

    /// Retries after a transport failure
    #[arg(long, env = "CUSTOMERIO_RETRY_COUNT", global = true)]
    pub retries: Option<u32>,

    /// Log request timing on success
    #[arg(long, global = true)]
    pub trace: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check credentials and look up the account region
    Auth(AuthArgs),

    /// Create, update, or delete customers
    #[command(alias = "cust")]
    Customers(CustomersArgs),

    /// Register or remove push devices
    #[command(alias = "dev")]
    Devices(DevicesArgs),

    /// Track customer or anonymous events
    Events(EventsArgs),

    /// Send transactional email
    Email(EmailArgs),

    /// Create or replace collections
    #[command(alias = "coll")]
    Collections(CollectionsArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Verify the tracking credentials
    Test,

    /// Show the data center for the tracking credentials
    Region,
}

// ── Customers ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommand,
}

#[derive(Debug, Subcommand)]
pub enum CustomersCommand {
    /// Create or update a customer
    Update {
        /// Customer ID (or email, if the workspace identifies by email)
        id: String,

        /// Attributes as a JSON object
        #[arg(long, short = 'd', default_value = "{}")]
        data: String,
    },

    /// Delete a customer
    Delete {
        /// Customer ID or email
        id: String,
    },
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// Create or update a customer's device
    Update {
        /// Customer ID or email
        customer: String,

        /// Device push token
        device_id: String,

        /// Device platform: ios or android
        #[arg(long, short = 'p')]
        platform: DevicePlatform,

        /// Last-used time as a unix timestamp (defaults to now)
        #[arg(long)]
        last_used: Option<i64>,
    },

    /// Remove a customer's device
    Delete {
        /// Customer ID or email
        customer: String,

        /// Device push token
        device_id: String,
    },
}

// ── Events ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// Record an event
    #[command(group(
        ArgGroup::new("target").required(true).args(["customer", "anonymous"])
    ))]
    Send {
        /// Event name
        name: String,

        /// Customer ID or email the event belongs to
        #[arg(long, short = 'c')]
        customer: Option<String>,

        /// Record the event without a customer
        #[arg(long)]
        anonymous: bool,

        /// Event data as JSON
        #[arg(long, short = 'd', default_value = "{}")]
        data: String,

        /// Event time as a unix timestamp (defaults to now)
        #[arg(long)]
        timestamp: Option<i64>,
    },
}

// ── Email ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EmailArgs {
    #[command(subcommand)]
    pub command: EmailCommand,
}

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Send a transactional email described by a JSON file
    Send {
        /// JSON request file ("-" for stdin)
        file: PathBuf,

        /// Attach a file (repeatable)
        #[arg(long, short = 'a')]
        attach: Vec<PathBuf>,
    },
}

// ── Collections ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CollectionsArgs {
    #[command(subcommand)]
    pub command: CollectionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CollectionsCommand {
    /// Create a collection, or replace one when --id is given
    #[command(group(
        ArgGroup::new("source").required(true).args(["data_file", "url"])
    ))]
    Update {
        /// Collection name
        #[arg(long, short = 'n')]
        name: String,

        /// Existing collection ID to replace
        #[arg(long)]
        id: Option<String>,

        /// JSON array of rows ("-" for stdin)
        #[arg(long)]
        data_file: Option<PathBuf>,

        /// URL of a JSON document or shared Google Sheet
        #[arg(long)]
        url: Option<String>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration with keys redacted
    Show,

    /// Print the default config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }
}
