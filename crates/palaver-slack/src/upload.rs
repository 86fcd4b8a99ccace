//! Chunked file upload
//!
//! Large files are split at the chunk ceiling and sent as `"upload"` frames,
//! each carrying a descriptor that lets the server reassemble the file. The
//! first failed chunk abandons the upload; there is no partial retry.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use palaver_proto::{chunk_count, AgentProfile, ChunkDescriptor, Frame};
use rand::Rng;
use tracing::debug;

use crate::channel::{SlackChannel, UPLOAD_KIND};
use crate::error::ChannelError;
use crate::transport::Transport;

impl<T: Transport> SlackChannel<T> {
    pub(crate) async fn upload_chunked(
        &self,
        profile: &AgentProfile,
        filename: &str,
        data: &[u8],
    ) -> Result<(), ChannelError> {
        if !profile.has_identity() {
            return Err(ChannelError::MissingIdentity);
        }

        let total = chunk_count(data.len(), self.config.chunk_ceiling);
        if total == 0 {
            debug!("Nothing to upload for {}", filename);
            return Ok(());
        }

        let upload_id = new_upload_id();
        let encoded_filename = STANDARD.encode(filename);
        debug!(
            "Uploading {} as {} chunk(s) under id {}",
            filename, total, upload_id
        );

        for (offset, chunk) in data.chunks(self.config.chunk_ceiling).enumerate() {
            let index = offset + 1;
            let descriptor = ChunkDescriptor {
                upload_id: upload_id.clone(),
                encoded_filename: encoded_filename.clone(),
                index,
                total,
            };
            let frame = Frame::new(UPLOAD_KIND, &profile.paw, Bytes::copy_from_slice(chunk));

            self.post_frame(&frame, Some(&descriptor.to_string()))
                .await
                .map_err(|source| ChannelError::UploadChunk {
                    index,
                    total,
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }
}

/// Random upload identifier tying a file's chunks together
fn new_upload_id() -> String {
    rand::thread_rng().gen::<u64>().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SlackConfig;
    use crate::test_utils::MockTransport;

    fn channel_with_ceiling(ceiling: usize) -> SlackChannel<MockTransport> {
        let mut config = SlackConfig::for_channel("C01TEST");
        config.bearer_token = "xoxb-test".to_string();
        config.chunk_ceiling = ceiling;
        SlackChannel::with_transport(config, MockTransport::new())
    }

    #[tokio::test]
    async fn test_chunk_descriptors_sequence() {
        let ch = channel_with_ceiling(4);
        let profile = AgentProfile::new("paw1", 30);

        // 10 bytes at a ceiling of 4 is three chunks of 4, 4, and 2.
        ch.upload_chunked(&profile, "log.txt", b"0123456789")
            .await
            .unwrap();

        let posts = ch.transport.posted_bodies("chat.postMessage");
        assert_eq!(posts.len(), 3);

        let filename_b64 = STANDARD.encode("log.txt");
        for (i, post) in posts.iter().enumerate() {
            assert!(post["text"].as_str().unwrap().starts_with("upload-paw1 | "));
            let descriptor: ChunkDescriptor = post["attachments"][0]["fallback"]
                .as_str()
                .unwrap()
                .parse()
                .unwrap();
            assert_eq!(descriptor.encoded_filename, filename_b64);
            assert_eq!(descriptor.index, i + 1);
            assert_eq!(descriptor.total, 3);
        }

        // Every chunk of one file shares the upload id.
        let first: ChunkDescriptor = posts[0]["attachments"][0]["fallback"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        let last: ChunkDescriptor = posts[2]["attachments"][0]["fallback"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(first.upload_id, last.upload_id);
    }

    #[tokio::test]
    async fn test_chunk_payloads_partition_data() {
        let ch = channel_with_ceiling(4);
        let profile = AgentProfile::new("paw1", 30);
        ch.upload_chunked(&profile, "log.txt", b"0123456789")
            .await
            .unwrap();

        let posts = ch.transport.posted_bodies("chat.postMessage");
        let mut reassembled = Vec::new();
        for post in &posts {
            let text = post["text"].as_str().unwrap();
            let encoded = text.strip_prefix("upload-paw1 | ").unwrap();
            reassembled.extend_from_slice(&palaver_proto::frame::decode_base64(encoded).unwrap());
        }
        assert_eq!(reassembled, b"0123456789");
    }

    #[tokio::test]
    async fn test_failed_chunk_aborts_upload() {
        let ch = channel_with_ceiling(4);
        ch.transport.fail_post(2);
        let profile = AgentProfile::new("paw1", 30);

        let result = ch.upload_chunked(&profile, "log.txt", b"0123456789").await;
        let Err(ChannelError::UploadChunk { index, total, .. }) = result else {
            panic!("expected upload abort");
        };
        assert_eq!(index, 2);
        assert_eq!(total, 3);

        // Chunk 1 went out, chunk 3 was never attempted.
        assert_eq!(ch.transport.posted_bodies("chat.postMessage").len(), 2);
    }

    #[tokio::test]
    async fn test_empty_payload_sends_nothing() {
        let ch = channel_with_ceiling(4);
        let profile = AgentProfile::new("paw1", 30);

        ch.upload_chunked(&profile, "empty.bin", b"").await.unwrap();
        assert!(ch.transport.posted_bodies("chat.postMessage").is_empty());
    }

    #[tokio::test]
    async fn test_upload_requires_identity() {
        let ch = channel_with_ceiling(4);
        let profile = AgentProfile::new("", 30);

        let result = ch.upload_chunked(&profile, "log.txt", b"data").await;
        assert!(matches!(result, Err(ChannelError::MissingIdentity)));
    }
}
