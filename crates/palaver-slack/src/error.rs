//! Error types for channel operations

use palaver_proto::ProtocolError;
use thiserror::Error;

use crate::transport::TransportError;

/// Channel-level errors.
///
/// Every failure mode a caller might want to distinguish is its own variant:
/// transport faults are transient and worth retrying next cycle, protocol
/// faults abort a single message, API faults mean the remote refused the
/// call, and upload faults are fatal to the whole upload.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Network, timeout, or body-read failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Malformed frame text, bad base64, or a record that failed to
    /// serialize
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The remote API answered without a success indicator
    #[error("{call} failed: {detail}")]
    Api {
        /// API method that failed
        call: &'static str,
        /// Error code or raw detail from the response
        detail: String,
    },

    /// Negotiation criteria did not contain the shared secret
    #[error("Negotiation criteria missing the shared secret")]
    MissingSecret,

    /// Operation requires an agent identifier the profile does not have
    #[error("Agent profile has no identifier")]
    MissingIdentity,

    /// A chunk send failed; the upload is abandoned
    #[error("Upload aborted at chunk {index}/{total}: {source}")]
    UploadChunk {
        /// 1-based index of the failed chunk
        index: usize,
        /// Total chunks in the upload
        total: usize,
        /// Underlying failure
        #[source]
        source: Box<ChannelError>,
    },
}
