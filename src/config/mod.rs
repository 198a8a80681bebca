//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig)
//! - [`channel`]: Channel behaviour knobs (KNOCK cooldowns)
//! - [`limits`]: Queue sizing (LimitsConfig)
//! - [`validation`]: Startup checks that collect every problem at once

mod channel;
mod limits;
mod types;
pub mod validation;

pub use channel::ChannelConfig;
pub use limits::LimitsConfig;
pub use types::{Config, ConfigError, ServerConfig};
pub use validation::{ValidationError, validate};
