// Error classification for responses whose status did not match.
//
// The App API's transactional email endpoint wraps failures in
// `{"meta":{"error":"..."}}`; every other endpoint's body is kept verbatim.
// Classification never fails: an unparseable email error body degrades to
// its raw text.

use bytes::Bytes;
use serde::Deserialize;

use crate::error::ClassifiedError;

/// Path of the transactional email send endpoint.
pub const TRANSACTIONAL_EMAIL_PATH: &str = "/v1/send/email";

#[derive(Deserialize)]
struct TransactionalEnvelope {
    meta: TransactionalMeta,
}

#[derive(Deserialize)]
struct TransactionalMeta {
    error: String,
}

/// Turn a non-matching response into the error variant for its endpoint.
pub fn classify(target_url: &str, status: u16, body: Bytes) -> ClassifiedError {
    if target_url.contains(TRANSACTIONAL_EMAIL_PATH) {
        let message = match serde_json::from_slice::<TransactionalEnvelope>(&body) {
            Ok(envelope) => envelope.meta.error,
            Err(_) => String::from_utf8_lossy(&body).into_owned(),
        };
        ClassifiedError::Transactional { status, message }
    } else {
        ClassifiedError::Api {
            status,
            url: target_url.to_owned(),
            body,
        }
    }
}
