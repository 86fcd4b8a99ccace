//! Channel resolution by name
//!
//! The set of channels is fixed at compile time and listed here. Resolution
//! is case-insensitive on the name the host supplies.

use palaver_slack::{ChatChannel, SlackChannel, SlackConfig, CHANNEL_NAME};

use crate::error::PalaverError;

/// Names the factory can resolve
pub fn available_channels() -> &'static [&'static str] {
    &[CHANNEL_NAME]
}

/// Resolve a channel by name.
///
/// The configuration is handed to the channel instance; nothing is shared
/// between two channels resolved from the same config value.
pub fn resolve(name: &str, config: SlackConfig) -> Result<Box<dyn ChatChannel>, PalaverError> {
    match name.to_ascii_lowercase().as_str() {
        CHANNEL_NAME => {
            let channel = SlackChannel::new(config)?;
            Ok(Box::new(channel))
        }
        other => Err(PalaverError::UnknownChannel(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_known_channel() {
        let channel = resolve("slack", SlackConfig::for_channel("C01")).unwrap();
        assert_eq!(channel.name(), "slack");
    }

    #[test]
    fn test_resolution_is_case_insensitive() {
        let channel = resolve("Slack", SlackConfig::for_channel("C01")).unwrap();
        assert_eq!(channel.name(), "slack");
    }

    #[test]
    fn test_unknown_channel_is_an_error() {
        let result = resolve("pigeon", SlackConfig::for_channel("C01"));
        assert!(
            matches!(result, Err(PalaverError::UnknownChannel(ref name)) if name == "pigeon")
        );
    }

    #[test]
    fn test_available_channels_lists_slack() {
        assert!(available_channels().contains(&"slack"));
    }
}
