//! Channel behaviour configuration.

use serde::Deserialize;
use std::time::Duration;

/// `[channel]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// Seconds a local user must wait between two KNOCKs (default: 300).
    #[serde(default = "default_knock_delay")]
    pub knock_delay: u64,
    /// Seconds between two accepted KNOCKs on the same channel (default: 60).
    #[serde(default = "default_knock_delay_channel")]
    pub knock_delay_channel: u64,
}

impl ChannelConfig {
    /// Per-requester cooldown.
    pub fn knock_delay(&self) -> Duration {
        Duration::from_secs(self.knock_delay)
    }

    /// Per-channel cooldown.
    pub fn knock_delay_channel(&self) -> Duration {
        Duration::from_secs(self.knock_delay_channel)
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            knock_delay: default_knock_delay(),
            knock_delay_channel: default_knock_delay_channel(),
        }
    }
}

fn default_knock_delay() -> u64 {
    300
}

fn default_knock_delay_channel() -> u64 {
    60
}
