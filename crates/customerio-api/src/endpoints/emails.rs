// App API transactional email endpoint.
//
// Failures from this endpoint carry `{"meta":{"error":"..."}}` and surface
// as `ClassifiedError::Transactional`.

use std::collections::BTreeMap;
use std::io::Read;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require;
use crate::classify::TRANSACTIONAL_EMAIL_PATH;
use crate::client::Client;
use crate::error::Error;

/// A transactional email, either rendered from a template
/// (`transactional_message_id`) or fully specified inline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub transactional_message_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub to: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub from: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subject: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub amp_body: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub plaintext_body: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub preheader: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bcc: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reply_to: String,
    /// Who the message is for, e.g. `{"id": "123"}`. Always sent.
    #[serde(default)]
    pub identifiers: BTreeMap<String, String>,
    /// Liquid data for the template.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub message_data: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// File name → base64 content. Fill via [`EmailRequest::attach`].
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attachments: BTreeMap<String, String>,
    #[serde(default, rename = "tracked", skip_serializing_if = "Option::is_none")]
    pub enable_tracking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_message_retention: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fake_bcc: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_draft: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_to_unsubscribed: Option<bool>,
}

impl EmailRequest {
    /// Read `content` to the end and add it as a base64 attachment.
    pub fn attach(&mut self, name: impl Into<String>, mut content: impl Read) -> Result<(), Error> {
        let name = name.into();
        if self.attachments.contains_key(&name) {
            return Err(Error::AttachmentExists { name });
        }
        let mut raw = Vec::new();
        content.read_to_end(&mut raw)?;
        self.attachments.insert(name, STANDARD.encode(raw));
        Ok(())
    }

    /// Check required fields; the set depends on whether a template is used.
    pub fn validate(&self) -> Result<(), Error> {
        if self.transactional_message_id.is_empty() {
            require(&self.body, "emailBody")?;
            require(&self.subject, "emailSubject")?;
            require(&self.to, "emailTo")?;
            require(&self.from, "emailFrom")?;
        } else {
            require(&self.to, "emailTo")?;
        }
        if self.identifiers.is_empty() {
            return Err(Error::Param {
                param: "emailIdentifiers",
            });
        }
        Ok(())
    }
}

/// Acknowledgement for a queued transactional message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailResponse {
    pub delivery_id: String,
    /// When the message was queued (unix seconds on the wire).
    #[serde(with = "chrono::serde::ts_seconds")]
    pub queued_at: DateTime<Utc>,
}

impl Client {
    /// Send a single transactional email.
    ///
    /// `POST {app}/v1/send/email`
    pub async fn send_email(&self, request: &EmailRequest) -> Result<EmailResponse, Error> {
        request.validate()?;
        let url = self.app_url(TRANSACTIONAL_EMAIL_PATH.trim_start_matches('/'));
        self.post(&url, request).await?.json()
    }
}
