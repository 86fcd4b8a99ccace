//! Error types for protocol operations

use thiserror::Error;

/// Protocol-specific errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Frame text has no `" | "` separator
    #[error("Malformed frame: missing separator")]
    MissingSeparator,

    /// Frame payload is not valid base64
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// Record could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Upload descriptor text does not match the expected format
    #[error("Invalid upload descriptor: {0}")]
    InvalidDescriptor(String),
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
