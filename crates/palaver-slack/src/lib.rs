//! # Palaver Slack Channel
//!
//! The Slack-backed beacon channel: an authenticated HTTP transport, message
//! store access with delete-after-read semantics, the heartbeat/instruction
//! poll protocol, a chunked uploader, and channel negotiation, all behind the
//! [`ChatChannel`] trait.

#![warn(missing_docs)]

/// Channel configuration
pub mod config;

/// HTTP transport abstraction and implementation
pub mod transport;

/// Slack API wire types
pub mod api;

/// Channel trait and the Slack implementation
pub mod channel;

/// Channel negotiation types
pub mod negotiate;

/// Error types for channel operations
pub mod error;

/// Test utilities for exercising the channel without a live API
pub mod test_utils;

mod beacon;
mod store;
mod upload;

pub use channel::{ChatChannel, SlackChannel, CHANNEL_NAME};
pub use config::SlackConfig;
pub use error::ChannelError;
pub use negotiate::{NegotiationCriteria, NegotiationOutcome};
pub use transport::{HttpTransport, Transport, TransportError};
