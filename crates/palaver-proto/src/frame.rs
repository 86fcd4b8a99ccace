//! Frame structure and text codec
//!
//! A frame is the text body of one chat message: a routing descriptor
//! `"{kind}-{id}"`, the `" | "` separator, then the base64-encoded payload.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;

use crate::ProtocolError;

/// Separator between the routing descriptor and the payload
pub const FRAME_SEPARATOR: &str = " | ";

/// Protocol frame: routing pair plus opaque payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message kind (e.g. `"beacon"`, `"instructions"`, `"results"`)
    pub kind: String,
    /// Addressee identifier, usually the agent paw
    pub id: String,
    /// Opaque payload bytes
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame
    pub fn new(kind: impl Into<String>, id: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            payload: payload.into(),
        }
    }

    /// The routing descriptor that prefixes the frame text
    pub fn descriptor(&self) -> String {
        descriptor(&self.kind, &self.id)
    }

    /// Encode the frame into a single message body
    pub fn encode(&self) -> String {
        format!(
            "{}{}{}",
            self.descriptor(),
            FRAME_SEPARATOR,
            BASE64.encode(&self.payload)
        )
    }

    /// Get the payload size
    pub fn payload_size(&self) -> usize {
        self.payload.len()
    }
}

/// Build the routing descriptor for a `(kind, id)` pair
pub fn descriptor(kind: &str, id: &str) -> String {
    format!("{}-{}", kind, id)
}

/// Check whether a message body is addressed to `(kind, id)`.
///
/// A body matches iff it starts with exactly the descriptor followed by the
/// separator, so the filter `("beacon", "12")` does not match a message
/// addressed `"beacon-123"`.
pub fn matches(text: &str, kind: &str, id: &str) -> bool {
    match text.strip_prefix(&descriptor(kind, id)) {
        Some(rest) => rest.starts_with(FRAME_SEPARATOR),
        None => false,
    }
}

/// Extract the base64 payload text after the separator, without decoding
pub fn payload_text(text: &str) -> Result<&str, ProtocolError> {
    text.split_once(FRAME_SEPARATOR)
        .map(|(_, rest)| rest)
        .ok_or(ProtocolError::MissingSeparator)
}

/// Decode the payload of an encoded frame body.
///
/// Splits on the first separator occurrence and base64-decodes the
/// remainder. A missing separator or invalid base64 is a hard error for
/// this message; it is never retried.
pub fn decode_payload(text: &str) -> Result<Bytes, ProtocolError> {
    let encoded = payload_text(text)?;
    decode_base64(encoded)
}

/// Decode a bare base64 payload string (used for attachment contents, which
/// carry the base64 text without the routing prefix)
pub fn decode_base64(encoded: &str) -> Result<Bytes, ProtocolError> {
    Ok(Bytes::from(BASE64.decode(encoded.trim_end())?))
}
