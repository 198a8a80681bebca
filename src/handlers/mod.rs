//! IRC command handlers.
//!
//! This module contains the Handler trait and command registry for
//! dispatching incoming IRC messages to appropriate handlers.

pub mod channel;
pub mod core;
mod helpers;

pub use self::core::{Context, Handler, Registry, Route, Source, SourceKind};
pub use channel::{KnockDelivered, KnockHandler};
pub use helpers::{server_notice, server_reply, uid_message};
