//! # Palaver
//!
//! Composition layer for the beacon transport: a factory that resolves
//! [`ChatChannel`] implementations by name, and a [`BeaconSession`] that
//! owns one channel plus the agent profile and drives the beacon cycle.
//!
//! Channels are wired in here explicitly; there is no runtime registry to
//! populate at load time.

#![warn(missing_docs)]

/// Channel resolution by name
pub mod factory;

/// Agent-side session loop driving one channel
pub mod session;

/// Composition-level error types
pub mod error;

pub use error::PalaverError;
pub use factory::{available_channels, resolve};
pub use session::BeaconSession;

pub use palaver_proto::{AgentProfile, ExecutionResult};
pub use palaver_slack::{ChatChannel, NegotiationCriteria, SlackConfig};
