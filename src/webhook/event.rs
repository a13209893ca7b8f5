//! Webhook payload schema.
//!
//! Decoding is structural only: unknown fields are ignored and absent ones
//! take their default, so new platform fields never break parsing.
//! Serialization skips absent optionals and empty lists, which makes
//! re-encoded events parse back equal.

use serde::{Deserialize, Serialize};

use super::ParseError;

/// One webhook delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookEvent {
    /// Object type tag, `whatsapp_business_account` for WhatsApp.
    pub object: String,
    /// Entries in delivery order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<WebhookEntry>,
}

impl WebhookEvent {
    /// Iterates over every change of every entry, in order.
    pub fn changes(&self) -> impl Iterator<Item = &WebhookChange> {
        self.entry.iter().flat_map(|entry| entry.changes.iter())
    }

    /// Counts inbound messages across all changes.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.changes().map(|change| change.value.messages.len()).sum()
    }

    /// Counts status updates across all changes.
    #[must_use]
    pub fn status_count(&self) -> usize {
        self.changes().map(|change| change.value.statuses.len()).sum()
    }
}

/// A business account entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookEntry {
    /// WhatsApp Business Account id.
    pub id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<WebhookChange>,
}

/// A single change notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookChange {
    /// Subscribed field, usually `messages`.
    pub field: String,
    pub value: WebhookValue,
}

/// Payload of a change.
///
/// Messages and statuses may both be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookValue {
    pub messaging_product: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<Contact>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<InboundMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<MessageStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<WebhookError>,
}

/// The business phone number that received the change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub display_phone_number: String,
    pub phone_number_id: String,
}

/// Sender of inbound messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub wa_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ContactProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactProfile {
    pub name: String,
}

/// A message sent by a user to the business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InboundMessage {
    pub id: String,
    /// Sender's WhatsApp id.
    pub from: String,
    /// Unix seconds, as sent by the platform.
    pub timestamp: String,
    /// Message type, e.g. `text`, `image`, `interactive`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<MessageText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<MediaObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<MediaObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<MediaObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticker: Option<MediaObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interactive: Option<InteractiveObject>,
    /// Present when the message replies to another one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<MessageContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageText {
    pub body: String,
}

/// Media attachment reference. Download it through the media endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaObject {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractiveObject {
    /// Reply kind, e.g. `button_reply` or `list_reply`.
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageContext {
    pub from: String,
    pub id: String,
}

/// Delivery status of a message the business sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageStatus {
    pub id: String,
    /// `sent`, `delivered`, `read` or `failed`.
    pub status: String,
    pub timestamp: String,
    pub recipient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation: Option<ConversationRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<WebhookError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<ConversationOrigin>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationOrigin {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pricing {
    pub billable: bool,
    pub pricing_model: String,
    pub category: String,
}

/// Error reported by the platform inside a change or status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookError {
    pub code: i64,
    pub title: String,
    pub message: String,
}

/// Decodes a raw delivery body.
///
/// # Errors
///
/// Returns [`ParseError`] for malformed JSON or a payload whose shape does
/// not match the schema (e.g. `entry` not being a list).
pub fn parse_event(body: &[u8]) -> Result<WebhookEvent, ParseError> {
    Ok(serde_json::from_slice(body)?)
}
