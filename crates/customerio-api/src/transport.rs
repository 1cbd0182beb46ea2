// Transport layer: builds the shared `reqwest::Client`, executes requests with
// the configured retry policy, and captures per-request timing.
//
// Retries only cover failures where no response arrived. A response with any
// status is handed back as-is; deciding what a status means is the
// dispatcher's job.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::StatusCode;
use tracing::warn;

use crate::config::ClientConfig;
use crate::error::Error;

/// How transport-level failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 disables retrying).
    pub max_retries: u32,
    /// Wait before the first retry; doubles for each further retry.
    pub initial_backoff: Duration,
    /// Upper bound for a single wait.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: crate::config::DEFAULT_RETRY_COUNT,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Wait before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1_u32 << retry.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Shared transport configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub retry: RetryPolicy,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: crate::config::DEFAULT_HTTP_TIMEOUT,
            user_agent: crate::config::DEFAULT_USER_AGENT.to_owned(),
            retry: RetryPolicy::default(),
        }
    }
}

impl TransportConfig {
    pub fn from_client_config(config: &ClientConfig) -> Self {
        Self {
            timeout: config.http_timeout(),
            user_agent: config.user_agent().to_owned(),
            retry: RetryPolicy::new(config.retry_count()),
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to build HTTP client: {e}"),
            })
    }
}

/// Timing captured for one dispatched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceInfo {
    /// From the first attempt until response headers arrived.
    pub time_to_headers: Duration,
    /// From the first attempt until the body was fully read.
    pub total_time: Duration,
    /// Attempts made, including the successful one.
    pub attempts: u32,
    /// Peer address of the connection that answered, when known.
    pub remote_addr: Option<SocketAddr>,
}

/// A received response with its body fully read.
#[derive(Debug)]
pub(crate) struct Exchange {
    pub status: StatusCode,
    pub body: Bytes,
    pub trace: TraceInfo,
}

/// HTTP client plus retry policy, cheap to clone.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    retry: RetryPolicy,
}

impl Transport {
    pub fn new(http: reqwest::Client, retry: RetryPolicy) -> Self {
        Self { http, retry }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Send `request`, retrying transport failures per the policy, and read
    /// the whole body.
    pub(crate) async fn execute(&self, request: reqwest::Request) -> Result<Exchange, Error> {
        let started = Instant::now();
        let mut attempts = 0_u32;

        let response = loop {
            attempts += 1;
            // Streaming bodies cannot be replayed; send those exactly once.
            let Some(pending) = request.try_clone() else {
                break self.http.execute(request).await?;
            };
            match self.http.execute(pending).await {
                Ok(response) => break response,
                Err(err) if attempts <= self.retry.max_retries && is_retryable(&err) => {
                    let wait = self.retry.backoff(attempts);
                    warn!(
                        attempt = attempts,
                        backoff_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "transport failure, retrying"
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(err) => return Err(Error::Transport(err)),
            }
        };

        let time_to_headers = started.elapsed();
        let status = response.status();
        let remote_addr = response.remote_addr();
        let body = response.bytes().await?;

        Ok(Exchange {
            status,
            body,
            trace: TraceInfo {
                time_to_headers,
                total_time: started.elapsed(),
                attempts,
                remote_addr,
            },
        })
    }
}

fn is_retryable(err: &reqwest::Error) -> bool {
    !err.is_builder() && (err.is_connect() || err.is_timeout() || err.is_request())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(400));
        assert_eq!(policy.backoff(6), Duration::from_secs(2));
        assert_eq!(policy.backoff(40), Duration::from_secs(2));
    }

    #[test]
    fn transport_config_follows_client_config() {
        let config = crate::ClientBuilder::new()
            .app_key("key")
            .retry_count(7)
            .http_timeout(Duration::from_secs(4))
            .user_agent("agent/1")
            .build_config()
            .unwrap();
        let transport = TransportConfig::from_client_config(&config);
        assert_eq!(transport.retry.max_retries, 7);
        assert_eq!(transport.timeout, Duration::from_secs(4));
        assert_eq!(transport.user_agent, "agent/1");
        assert!(transport.build_client().is_ok());
    }
}
