//! Queue sizing configuration.

use serde::Deserialize;

/// `[limits]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Capacity of each outbound queue, per local user and per peer link
    /// (default: 512). A full queue drops the message instead of blocking.
    #[serde(default = "default_sendq_capacity")]
    pub sendq_capacity: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            sendq_capacity: default_sendq_capacity(),
        }
    }
}

fn default_sendq_capacity() -> usize {
    512
}
