//! Chunk arithmetic and upload descriptors

use std::fmt;
use std::str::FromStr;

use crate::ProtocolError;

/// Chunk size ceiling in raw bytes. The remote service caps attachments at
/// 1MB per message; base64 inflation of 786432 bytes would already hit that
/// limit, so the ceiling stays below it.
pub const MAX_CHUNK_SIZE: usize = 750_000;

/// Number of chunks needed to carry `len` bytes under `ceiling`.
///
/// Zero only for an empty payload.
pub fn chunk_count(len: usize, ceiling: usize) -> usize {
    len.div_ceil(ceiling)
}

/// Descriptor accompanying one uploaded chunk.
///
/// Wire form: `"upload:{uploadId}:{base64Filename}:{chunkIndex}:{totalChunks}"`,
/// with 1-based chunk indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkDescriptor {
    /// Random per-upload nonce, shared by every chunk of one upload
    pub upload_id: String,
    /// Base64-encoded destination filename
    pub encoded_filename: String,
    /// 1-based position of this chunk
    pub index: usize,
    /// Total number of chunks in the upload
    pub total: usize,
}

impl ChunkDescriptor {
    /// Create a descriptor for one chunk of an upload
    pub fn new(
        upload_id: impl Into<String>,
        encoded_filename: impl Into<String>,
        index: usize,
        total: usize,
    ) -> Self {
        Self {
            upload_id: upload_id.into(),
            encoded_filename: encoded_filename.into(),
            index,
            total,
        }
    }
}

impl fmt::Display for ChunkDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "upload:{}:{}:{}:{}",
            self.upload_id, self.encoded_filename, self.index, self.total
        )
    }
}

impl FromStr for ChunkDescriptor {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let tag = parts.next().unwrap_or_default();
        let (Some(upload_id), Some(encoded_filename), Some(index), Some(total), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(ProtocolError::InvalidDescriptor(format!(
                "expected 5 colon-separated fields: {s}"
            )));
        };
        if tag != "upload" {
            return Err(ProtocolError::InvalidDescriptor(format!(
                "unknown descriptor tag: {tag}"
            )));
        }
        let index: usize = index
            .parse()
            .map_err(|_| ProtocolError::InvalidDescriptor(format!("bad chunk index: {index}")))?;
        let total: usize = total
            .parse()
            .map_err(|_| ProtocolError::InvalidDescriptor(format!("bad chunk total: {total}")))?;
        if index == 0 || index > total {
            return Err(ProtocolError::InvalidDescriptor(format!(
                "chunk index {index} out of range 1..={total}"
            )));
        }
        Ok(Self {
            upload_id: upload_id.to_string(),
            encoded_filename: encoded_filename.to_string(),
            index,
            total,
        })
    }
}
