// Track API event endpoints.
//
// Event data may be any serializable value (a map or a typed struct). Its
// JSON encoding is capped at `MAX_EVENT_DATA_BYTES`; other surfaces have no
// such cap.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::require;
use crate::client::Client;
use crate::error::Error;

/// Largest accepted JSON encoding of an event's `data`.
pub const MAX_EVENT_DATA_BYTES: usize = 56_000;

#[derive(Debug, Serialize)]
struct EventBody<'a> {
    name: &'a str,
    data: serde_json::Value,
    timestamp: i64,
}

impl<'a> EventBody<'a> {
    fn new<D>(name: &'a str, timestamp: Option<DateTime<Utc>>, data: &D) -> Result<Self, Error>
    where
        D: Serialize + ?Sized,
    {
        let data = serde_json::to_value(data)?;
        let size = serde_json::to_vec(&data)?.len();
        if size > MAX_EVENT_DATA_BYTES {
            return Err(Error::PayloadTooLarge {
                limit: MAX_EVENT_DATA_BYTES,
                size,
            });
        }
        Ok(Self {
            name,
            data,
            timestamp: timestamp.unwrap_or_else(Utc::now).timestamp(),
        })
    }
}

impl Client {
    /// Record an event for a customer.
    ///
    /// Pass a `timestamp` to backfill; `None` records it as now (UTC).
    ///
    /// `POST {track}/api/v1/customers/{id}/events`
    pub async fn new_event<D>(
        &self,
        customer_id_or_email: &str,
        event_name: &str,
        timestamp: Option<DateTime<Utc>>,
        data: &D,
    ) -> Result<(), Error>
    where
        D: Serialize + ?Sized + Sync,
    {
        require(customer_id_or_email, "customerIDOrEmail")?;
        require(event_name, "eventName")?;
        let body = EventBody::new(event_name, timestamp, data)?;
        let url = self.customer_url(customer_id_or_email, "/events");
        self.post(&url, &body).await.map(|_| ())
    }

    /// Record an event for an anonymous visitor.
    ///
    /// `POST {track}/api/v1/events`
    pub async fn new_anonymous_event<D>(
        &self,
        event_name: &str,
        timestamp: Option<DateTime<Utc>>,
        data: &D,
    ) -> Result<(), Error>
    where
        D: Serialize + ?Sized + Sync,
    {
        require(event_name, "eventName")?;
        let body = EventBody::new(event_name, timestamp, data)?;
        let url = self.tracking_url("api/v1/events");
        self.post(&url, &body).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn body_uses_given_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let body = EventBody::new("signup", Some(at), &json!({ "plan": "pro" })).unwrap();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "name": "signup", "data": { "plan": "pro" }, "timestamp": at.timestamp() })
        );
    }

    #[test]
    fn body_defaults_to_now() {
        let before = Utc::now().timestamp();
        let body = EventBody::new("signup", None, &json!({})).unwrap();
        assert!(body.timestamp >= before);
        assert!(body.timestamp <= Utc::now().timestamp());
    }

    #[test]
    fn typed_data_is_accepted() {
        #[derive(Serialize)]
        struct Purchase {
            sku: &'static str,
            cents: u32,
        }
        let body = EventBody::new("purchase", None, &Purchase { sku: "A1", cents: 999 }).unwrap();
        assert_eq!(body.data, json!({ "sku": "A1", "cents": 999 }));
    }

    #[test]
    fn oversized_data_is_rejected() {
        let data = json!({ "blob": "x".repeat(MAX_EVENT_DATA_BYTES) });
        let err = EventBody::new("big", None, &data).unwrap_err();
        assert!(matches!(
            err,
            Error::PayloadTooLarge { limit: MAX_EVENT_DATA_BYTES, size } if size > MAX_EVENT_DATA_BYTES
        ));
    }
}
