// customerio-api: Async Rust client for the Customer.io Track, App, and Beta APIs
//
// The three surfaces differ in base URL, auth scheme, and error body shape.
// `Client::dispatch` hides those differences; the endpoint modules are thin
// wrappers over it.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod region;
pub mod transport;

pub use auth::{AuthHeader, AuthScheme, select_auth};
pub use classify::classify;
pub use client::{ApiResponse, Client, NO_PAYLOAD};
pub use config::{ClientBuilder, ClientConfig, ClientOption};
pub use endpoints::account::RegionInfo;
pub use endpoints::customers::{Device, DevicePlatform};
pub use endpoints::emails::{EmailRequest, EmailResponse};
pub use endpoints::events::MAX_EVENT_DATA_BYTES;
pub use error::{ClassifiedError, Error};
pub use region::{Endpoints, Region};
pub use transport::{RetryPolicy, TraceInfo, Transport, TransportConfig};

// Re-exported so callers can name methods and statuses without a direct
// reqwest dependency.
pub use reqwest::{Method, StatusCode};
