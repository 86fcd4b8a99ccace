//! Channel negotiation types
//!
//! Negotiation gates the channel: the shared secret becomes the bearer
//! token, and an agent arriving without an identifier is assigned an
//! ephemeral random one which the host is expected to persist.

use palaver_proto::AgentProfile;
use rand::Rng;
use tracing::info;

use crate::channel::SlackChannel;
use crate::error::ChannelError;
use crate::transport::Transport;

/// Host-provided negotiation input
#[derive(Debug, Clone, Default)]
pub struct NegotiationCriteria {
    /// Shared secret adopted as the bearer token
    pub secret: Option<String>,
}

impl NegotiationCriteria {
    /// Criteria carrying a shared secret
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
        }
    }
}

/// Result of a successful negotiation
#[derive(Debug, Clone, Default)]
pub struct NegotiationOutcome {
    /// Identifier assigned to the agent, when it arrived without one
    pub assigned_id: Option<String>,
}

impl<T: Transport> SlackChannel<T> {
    pub(crate) fn negotiate_channel(
        &mut self,
        profile: &mut AgentProfile,
        criteria: &NegotiationCriteria,
    ) -> Result<NegotiationOutcome, ChannelError> {
        let secret = criteria
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ChannelError::MissingSecret)?;
        self.config.bearer_token = secret.to_string();

        let mut outcome = NegotiationOutcome::default();
        if !profile.has_identity() {
            let paw = new_agent_id();
            info!("Assigned ephemeral agent identifier {}", paw);
            profile.paw = paw.clone();
            outcome.assigned_id = Some(paw);
        }
        Ok(outcome)
    }
}

/// Random numeric agent identifier; collision risk accepted as negligible
fn new_agent_id() -> String {
    rand::thread_rng().gen::<u64>().to_string()
}
