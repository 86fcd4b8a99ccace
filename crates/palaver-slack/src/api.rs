//! Slack API wire types
//!
//! Request and response bodies for the three endpoints the channel consumes.
//! `ok` and `messages` default when absent: a response without a success
//! indicator is treated as a failed call, never as a panic.

use serde::{Deserialize, Serialize};

/// Body for `POST /chat.postMessage`
#[derive(Debug, Serialize)]
pub struct PostMessageBody<'a> {
    /// Target channel identifier
    pub channel: &'a str,
    /// Message body text (an encoded frame)
    pub text: &'a str,
    /// Legacy attachments; carries the chunk descriptor on uploads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<AttachmentBody<'a>>>,
}

/// One entry of the legacy `attachments` field
#[derive(Debug, Serialize)]
pub struct AttachmentBody<'a> {
    /// Plain-text rendering of the attachment
    pub fallback: &'a str,
}

/// Body for `POST /chat.delete`
#[derive(Debug, Serialize)]
pub struct DeleteBody<'a> {
    /// Target channel identifier
    pub channel: &'a str,
    /// Timestamp of the message to delete
    pub ts: &'a str,
}

/// Minimal response shape shared by the write endpoints
#[derive(Debug, Deserialize)]
pub struct ApiStatus {
    /// Success indicator; absent means failure
    #[serde(default)]
    pub ok: bool,
    /// Error code reported by the API
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `GET /conversations.history`
#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    /// Success indicator; absent means failure
    #[serde(default)]
    pub ok: bool,
    /// Error code reported by the API
    #[serde(default)]
    pub error: Option<String>,
    /// Messages in the window, newest first
    #[serde(default)]
    pub messages: Vec<ChannelMessage>,
}

/// One message in the channel history
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelMessage {
    /// Message body text
    #[serde(default)]
    pub text: String,
    /// Message timestamp, used as the deletion handle
    #[serde(default)]
    pub ts: String,
    /// File attachments, if any
    #[serde(default)]
    pub files: Vec<FileStub>,
}

/// Attachment metadata carried in a history message
#[derive(Debug, Clone, Deserialize)]
pub struct FileStub {
    /// Authenticated download URL for the file content
    #[serde(default)]
    pub url_private_download: Option<String>,
}

/// URL of the message-post endpoint
pub fn post_message_url(api_base: &str) -> String {
    format!("{}/chat.postMessage", api_base)
}

/// URL of the message-delete endpoint
pub fn delete_url(api_base: &str) -> String {
    format!("{}/chat.delete", api_base)
}

/// URL of the history endpoint for a channel and lookback start time
pub fn history_url(api_base: &str, channel_id: &str, oldest: u64) -> String {
    format!(
        "{}/conversations.history?channel={}&oldest={}",
        api_base, channel_id, oldest
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_body_omits_empty_attachments() {
        let body = PostMessageBody {
            channel: "C01",
            text: "beacon-1 | AA==",
            attachments: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["channel"], "C01");
        assert!(value.get("attachments").is_none());
    }

    #[test]
    fn test_history_response_defaults() {
        // No success indicator at all: parse succeeds, ok stays false.
        let resp: HistoryResponse = serde_json::from_str("{}").unwrap();
        assert!(!resp.ok);
        assert!(resp.messages.is_empty());

        let resp: HistoryResponse =
            serde_json::from_str(r#"{"ok":false,"error":"invalid_auth"}"#).unwrap();
        assert!(!resp.ok);
        assert_eq!(resp.error.as_deref(), Some("invalid_auth"));
    }

    #[test]
    fn test_history_message_parsing() {
        let resp: HistoryResponse = serde_json::from_str(
            r#"{"ok":true,"messages":[
                {"text":"beacon-1 | AA==","ts":"1700000000.000100"},
                {"text":"unrelated","ts":"1700000000.000200",
                 "files":[{"url_private_download":"https://files.example/1"}]}
            ]}"#,
        )
        .unwrap();
        assert!(resp.ok);
        assert_eq!(resp.messages.len(), 2);
        assert_eq!(resp.messages[0].ts, "1700000000.000100");
        assert_eq!(
            resp.messages[1].files[0].url_private_download.as_deref(),
            Some("https://files.example/1")
        );
    }

    #[test]
    fn test_url_builders() {
        assert_eq!(
            history_url("https://slack.com/api", "C01", 1700000000),
            "https://slack.com/api/conversations.history?channel=C01&oldest=1700000000"
        );
        assert_eq!(
            post_message_url("https://slack.com/api"),
            "https://slack.com/api/chat.postMessage"
        );
        assert_eq!(
            delete_url("https://slack.com/api"),
            "https://slack.com/api/chat.delete"
        );
    }
}
