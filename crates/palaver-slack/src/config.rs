//! Channel configuration
//!
//! One [`SlackConfig`] is owned by each channel instance; nothing here is
//! process-global. The bearer token starts empty and is filled in by
//! negotiation — calls made before that fail against the remote API's
//! `ok:false` path rather than crashing.

use std::time::Duration;

use palaver_proto::MAX_CHUNK_SIZE;

/// Wall-clock timeout applied to every HTTP call, in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Wait between instruction poll attempts, in seconds
pub const POLL_WAIT_SECS: u64 = 10;

/// Number of instruction poll attempts before giving up on a cycle
pub const MAX_POLL_ATTEMPTS: u32 = 3;

/// Extra delay inserted before the heartbeat when the profile's sleep
/// interval collides with the request timeout, in seconds
pub const GUARD_DELAY_SECS: u64 = 5;

/// Placeholder channel id, replaced when the binary is stamped or configured
pub const CHANNEL_ID_PLACEHOLDER: &str = "{SLACK_C2_CHANNEL_ID}";

/// Configuration for one Slack channel instance
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Base URL of the Slack web API
    pub api_base: String,
    /// Target channel identifier
    pub channel_id: String,
    /// Bearer token; empty until negotiation adopts the shared secret
    pub bearer_token: String,
    /// Wall-clock timeout for every HTTP call
    pub request_timeout: Duration,
    /// Wait between instruction poll attempts
    pub poll_wait: Duration,
    /// Instruction poll attempt cap per beacon cycle
    pub max_poll_attempts: u32,
    /// Delay inserted by the sleep-interval guard
    pub guard_delay: Duration,
    /// Chunk size ceiling for uploads, in raw bytes
    pub chunk_ceiling: usize,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            api_base: "https://slack.com/api".to_string(),
            channel_id: CHANNEL_ID_PLACEHOLDER.to_string(),
            bearer_token: String::new(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            poll_wait: Duration::from_secs(POLL_WAIT_SECS),
            max_poll_attempts: MAX_POLL_ATTEMPTS,
            guard_delay: Duration::from_secs(GUARD_DELAY_SECS),
            chunk_ceiling: MAX_CHUNK_SIZE,
        }
    }
}

impl SlackConfig {
    /// Create a configuration for a specific channel id
    pub fn for_channel(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            ..Default::default()
        }
    }

    /// History lookback window: messages older than twice the request
    /// timeout are not considered
    pub fn lookback(&self) -> Duration {
        self.request_timeout * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = SlackConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.poll_wait, Duration::from_secs(10));
        assert_eq!(config.max_poll_attempts, 3);
        assert_eq!(config.chunk_ceiling, 750_000);
        assert!(config.bearer_token.is_empty());
        assert_eq!(config.channel_id, CHANNEL_ID_PLACEHOLDER);
    }

    #[test]
    fn test_lookback_window() {
        let config = SlackConfig::default();
        assert_eq!(config.lookback(), Duration::from_secs(120));
    }
}
