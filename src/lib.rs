//! knockd - KNOCK extension core for a TS6 IRC daemon.
//!
//! A non-member asks the operators of a restricted channel for an invite.
//! This crate holds the request pipeline (ordered guards over shared
//! channel and user state), the operator notification and capability-gated
//! peer relay, and the module host that registers the command, the `KNOCK`
//! server capability and the `KNOCK` ISUPPORT token.
//!
//! Socket I/O, line framing and the link handshake live outside; callers
//! hand parsed lines to [`Server::dispatch`] and drain the per-connection
//! and per-link queues the [`state::Matrix`] hands out.

pub mod config;
pub mod error;
pub mod handlers;
pub mod isupport;
pub mod metrics;
pub mod modules;
pub mod server;
pub mod state;
pub mod sync;
pub mod telemetry;

pub use error::{HandlerError, HandlerResult, KnockError, KnockScope};
pub use server::Server;
