//! Ordered fan-out of parsed events to host callbacks.

use std::sync::Arc;

use http::HeaderMap;
use tracing::{debug, trace};

use super::{InboundMessage, MessageStatus, WebhookEvent};

/// Host callbacks for webhook deliveries.
///
/// Every method defaults to a no-op so implementations only override what
/// they care about. Callbacks run synchronously on the dispatching task.
pub trait WebhookHandler: Send + Sync {
    /// Called once per delivery, before any message or status callback.
    fn on_event(&self, _event: &WebhookEvent, _headers: &HeaderMap) {}

    /// Called once per inbound message.
    fn on_message(&self, _message: &InboundMessage) {}

    /// Called once per status update.
    fn on_status(&self, _status: &MessageStatus) {}
}

impl WebhookHandler for () {}

impl<H: WebhookHandler + ?Sized> WebhookHandler for Arc<H> {
    fn on_event(&self, event: &WebhookEvent, headers: &HeaderMap) {
        (**self).on_event(event, headers);
    }

    fn on_message(&self, message: &InboundMessage) {
        (**self).on_message(message);
    }

    fn on_status(&self, status: &MessageStatus) {
        (**self).on_status(status);
    }
}

/// Walks an event and invokes a [`WebhookHandler`].
///
/// Entries and changes are visited in input order. Within each change all
/// messages are delivered first, then all statuses, each in input order.
/// Nothing is filtered, merged or run concurrently.
#[derive(Debug, Clone)]
pub struct Dispatcher<H> {
    handler: H,
}

impl<H: WebhookHandler> Dispatcher<H> {
    /// Creates a dispatcher for `handler`.
    #[must_use]
    pub const fn new(handler: H) -> Self {
        Self { handler }
    }

    /// Returns the handler.
    #[must_use]
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Delivers `event` to the handler.
    pub fn dispatch(&self, event: &WebhookEvent, headers: &HeaderMap) {
        debug!(
            object = %event.object,
            entries = event.entry.len(),
            messages = event.message_count(),
            statuses = event.status_count(),
            "Dispatching webhook event"
        );
        self.handler.on_event(event, headers);

        for entry in &event.entry {
            for change in &entry.changes {
                trace!(entry = %entry.id, field = %change.field, "Dispatching change");
                for message in &change.value.messages {
                    self.handler.on_message(message);
                }
                for status in &change.value.statuses {
                    self.handler.on_status(status);
                }
            }
        }
    }
}
