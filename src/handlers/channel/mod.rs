//! Channel command handlers.
//!
//! Handles KNOCK.

mod knock;

pub use knock::{KnockDelivered, KnockHandler, knock};
