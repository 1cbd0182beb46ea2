// Track API customer and device endpoints.
//
// Customers are addressed by ID, or by email when the workspace identifies
// people by email.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::require;
use crate::client::{Client, segment};
use crate::error::Error;

/// Mobile platform of a customer device.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DevicePlatform {
    Ios,
    Android,
}

/// A device registered for push notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Push token.
    pub id: String,
    /// Unix timestamp (seconds) of the last time the device was used.
    pub last_used: i64,
    pub platform: DevicePlatform,
}

#[derive(Serialize)]
struct DeviceEnvelope<'a> {
    device: &'a Device,
}

impl Client {
    /// Create or update a customer and set their attributes.
    ///
    /// `PUT {track}/api/v1/customers/{id}`
    pub async fn update_customer<A>(&self, customer_id_or_email: &str, attributes: &A) -> Result<(), Error>
    where
        A: Serialize + ?Sized + Sync,
    {
        require(customer_id_or_email, "customerIDOrEmail")?;
        let url = self.customer_url(customer_id_or_email, "");
        self.put(&url, attributes).await.map(|_| ())
    }

    /// Remove a customer.
    ///
    /// `DELETE {track}/api/v1/customers/{id}`
    pub async fn delete_customer(&self, customer_id_or_email: &str) -> Result<(), Error> {
        require(customer_id_or_email, "customerIDOrEmail")?;
        let url = self.customer_url(customer_id_or_email, "");
        self.delete(&url).await.map(|_| ())
    }

    /// Create or update a customer's device.
    ///
    /// `PUT {track}/api/v1/customers/{id}/devices`
    pub async fn update_device(&self, customer_id_or_email: &str, device: &Device) -> Result<(), Error> {
        require(customer_id_or_email, "customerIDOrEmail")?;
        require(&device.id, "deviceID")?;
        let url = self.customer_url(customer_id_or_email, "/devices");
        self.put(&url, &DeviceEnvelope { device }).await.map(|_| ())
    }

    /// Remove a customer's device.
    ///
    /// `DELETE {track}/api/v1/customers/{id}/devices/{device_id}`
    pub async fn delete_device(&self, customer_id_or_email: &str, device_id: &str) -> Result<(), Error> {
        require(customer_id_or_email, "customerIDOrEmail")?;
        require(device_id, "deviceID")?;
        let url = self.customer_url(
            customer_id_or_email,
            &format!("/devices/{}", segment(device_id)),
        );
        self.delete(&url).await.map(|_| ())
    }

    pub(crate) fn customer_url(&self, customer_id_or_email: &str, suffix: &str) -> String {
        self.tracking_url(&format!(
            "api/v1/customers/{}{suffix}",
            segment(customer_id_or_email)
        ))
    }
}
