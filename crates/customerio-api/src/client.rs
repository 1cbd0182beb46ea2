// Request dispatch core.
//
// Every endpoint method funnels through `Client::dispatch`: attach the user
// agent, encode the JSON body for methods that carry one, pick the auth
// scheme for the target surface, execute through the transport, then either
// hand back the raw response or classify the mismatch. The dispatcher never
// retries or re-classifies; transport failures and encoding failures pass
// through untouched.

use std::borrow::Cow;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, trace};
use url::Url;

use crate::auth::select_auth;
use crate::classify::classify;
use crate::config::{ClientBuilder, ClientConfig};
use crate::error::Error;
use crate::transport::{TraceInfo, Transport, TransportConfig};

/// Payload placeholder for requests without a body.
pub const NO_PAYLOAD: Option<&()> = None;

/// A response whose status matched the caller's expectation.
///
/// The body is left undecoded; each endpoint knows its own schema.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Bytes,
    /// Timing for the call, present only when request tracing is enabled.
    pub trace: Option<TraceInfo>,
}

impl ApiResponse {
    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|e| {
            let body = self.text().into_owned();
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    /// The body as UTF-8 text (lossy).
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Async client for the Customer.io Track, App, and Beta APIs.
///
/// Cheap to clone: the HTTP connection pool and the resolved configuration
/// are both shared, and nothing in the dispatch path is mutable, so one
/// client can serve any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Transport,
    config: Arc<ClientConfig>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn from_parts(
        config: ClientConfig,
        http: Option<reqwest::Client>,
    ) -> Result<Self, Error> {
        let transport_config = TransportConfig::from_client_config(&config);
        let http = match http {
            Some(http) => http,
            None => transport_config.build_client()?,
        };
        Ok(Self {
            transport: Transport::new(http, transport_config.retry),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The `User-Agent` sent with every request.
    pub fn user_agent(&self) -> &str {
        self.config.user_agent()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Execute one request/response cycle.
    ///
    /// `payload` is JSON-encoded for every method except GET and DELETE,
    /// which never carry a body. A response whose status equals
    /// `expected_status` is returned as-is; any other status becomes
    /// [`Error::Classified`].
    pub async fn dispatch<P>(
        &self,
        method: Method,
        target_url: &str,
        expected_status: StatusCode,
        payload: Option<&P>,
    ) -> Result<ApiResponse, Error>
    where
        P: Serialize + ?Sized + Sync,
    {
        debug!("{method} {target_url}");

        let url = Url::parse(target_url)?;
        let with_body = carries_body(&method);

        let mut builder = self
            .transport
            .http()
            .request(method, url)
            .timeout(self.config.http_timeout())
            .header(USER_AGENT, self.config.user_agent());

        if with_body {
            let body = serde_json::to_vec(&payload)?;
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .header(CONTENT_LENGTH, body.len())
                .body(body);
        }

        let auth = select_auth(&self.config, target_url);
        trace!(scheme = ?auth.scheme(), "selected auth");
        let auth_value = auth.to_header_value().map_err(|e| Error::Config {
            message: format!("credential is not a valid header value: {e}"),
        })?;
        let request = builder.header(AUTHORIZATION, auth_value).build()?;

        let exchange = self.transport.execute(request).await?;

        if exchange.status == expected_status {
            let trace = self.config.request_tracing().then_some(exchange.trace);
            if let Some(ref t) = trace {
                info!(
                    url = target_url,
                    time_to_headers = ?t.time_to_headers,
                    total = ?t.total_time,
                    attempts = t.attempts,
                    remote_addr = ?t.remote_addr,
                    "request trace"
                );
            }
            return Ok(ApiResponse {
                status: exchange.status,
                body: exchange.body,
                trace,
            });
        }

        debug!(
            status = exchange.status.as_u16(),
            expected = expected_status.as_u16(),
            "unexpected status, classifying"
        );
        Err(classify(target_url, exchange.status.as_u16(), exchange.body).into())
    }

    // ── HTTP verbs ───────────────────────────────────────────────────
    //
    // Every documented endpoint answers 200 on success.

    pub(crate) async fn get(&self, url: &str) -> Result<ApiResponse, Error> {
        self.dispatch(Method::GET, url, StatusCode::OK, NO_PAYLOAD).await
    }

    pub(crate) async fn delete(&self, url: &str) -> Result<ApiResponse, Error> {
        self.dispatch(Method::DELETE, url, StatusCode::OK, NO_PAYLOAD)
            .await
    }

    pub(crate) async fn post<P: Serialize + ?Sized + Sync>(
        &self,
        url: &str,
        payload: &P,
    ) -> Result<ApiResponse, Error> {
        self.dispatch(Method::POST, url, StatusCode::OK, Some(payload))
            .await
    }

    pub(crate) async fn put<P: Serialize + ?Sized + Sync>(
        &self,
        url: &str,
        payload: &P,
    ) -> Result<ApiResponse, Error> {
        self.dispatch(Method::PUT, url, StatusCode::OK, Some(payload))
            .await
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{tracking}/{path}` with caller-supplied segments already escaped.
    pub(crate) fn tracking_url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.tracking_url())
    }

    pub(crate) fn app_url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.app_url())
    }

    pub(crate) fn beta_url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.beta_url())
    }
}

/// GET and DELETE never carry a body, whatever payload was supplied.
fn carries_body(method: &Method) -> bool {
    *method != Method::GET && *method != Method::DELETE
}

/// Escape a caller-supplied value for use as a single path segment.
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}
