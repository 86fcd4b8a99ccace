//! Composition-level error types

use palaver_slack::ChannelError;
use thiserror::Error;

/// Errors surfaced by the factory and session
#[derive(Debug, Error)]
pub enum PalaverError {
    /// The requested channel name is not wired into the factory
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    /// A channel operation failed
    #[error(transparent)]
    Channel(#[from] ChannelError),
}
