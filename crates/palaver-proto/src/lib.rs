//! # Palaver Protocol
//!
//! Wire text format and typed records for the Palaver beacon channel: the
//! `"{kind}-{id} | {base64}"` message frame, chunked-upload descriptors, and
//! the agent profile / execution result records carried inside frames.

#![warn(missing_docs)]

/// Frame structure and text codec
pub mod frame;

/// Chunk arithmetic and upload descriptors
pub mod chunk;

/// Agent profile and execution result records
pub mod profile;

/// Error types for protocol operations
pub mod error;

pub use frame::{Frame, FRAME_SEPARATOR};
pub use chunk::{chunk_count, ChunkDescriptor, MAX_CHUNK_SIZE};
pub use profile::{AgentProfile, ExecutionResult, ResultEnvelope};
pub use error::ProtocolError;
