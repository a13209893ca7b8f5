//! wacloud: WhatsApp Cloud API client core
//!
//! A library for calling the Graph API resiliently and for receiving
//! WhatsApp webhooks.
//!
//! - [`transport`]: retrying HTTP executor with backoff, jitter and
//!   transient-failure classification
//! - [`error`]: decoding of Graph API error envelopes
//! - [`webhook`]: verify-token handshake, payload signature checks, event
//!   parsing and dispatch
//! - [`client`]: authenticated facade over the executor
//! - [`config`]: TOML configuration with validation
//! - [`secrets`]: pluggable lookup of the verify token and app secret

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod secrets;
pub mod time;
pub mod transport;
pub mod webhook;
