//! Inbound webhook pipeline.
//!
//! Deliveries flow through three stages:
//! - [`Authenticator`]: verify-token handshake and `X-Hub-Signature-256`
//!   checks against secrets resolved per call
//! - [`parse_event`]: JSON decoding into [`WebhookEvent`]
//! - [`Dispatcher`]: ordered fan-out to a host-supplied [`WebhookHandler`]
//!
//! [`WebhookEndpoint`] wires the stages to `http` request and response
//! types so any server framework can host it.

mod auth;
mod dispatch;
mod endpoint;
mod error;
mod event;


pub use auth::{Authenticator, SIGNATURE_HEADER, SIGNATURE_PREFIX, sign};
pub use dispatch::{Dispatcher, WebhookHandler};
pub use endpoint::{HandshakeQuery, WebhookEndpoint};
pub use error::{AuthError, ParseError};
pub use event::{
    Contact, ContactProfile, ConversationOrigin, ConversationRef, InboundMessage,
    InteractiveObject, MediaObject, MessageContext, MessageStatus, MessageText, Metadata, Pricing,
    WebhookChange, WebhookEntry, WebhookError, WebhookEvent, WebhookValue, parse_event,
};
