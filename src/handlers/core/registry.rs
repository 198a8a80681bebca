//! Command handler registry and dispatch.
//!
//! The `Registry` maps verbs to handlers. Modules add and remove their
//! commands at activation time, so lookups hand out `Arc` clones that stay
//! valid while a handler runs even if its module is unloaded meanwhile.

use super::context::Context;
use super::traits::{Handler, Route};
use crate::error::{HandlerError, HandlerResult};
use crate::telemetry::{CommandTimer, spans};
use knockd_proto::{ChannelExt, Message};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{Instrument, debug};

/// Registry of command handlers.
#[derive(Default)]
pub struct Registry {
    handlers: HashMap<&'static str, Arc<dyn Handler>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler` for `command`, replacing any previous one.
    ///
    /// Returns true if the command was not registered before.
    pub fn register(&mut self, command: &'static str, handler: Arc<dyn Handler>) -> bool {
        self.handlers.insert(command, handler).is_none()
    }

    /// Remove `command`. Returns false if it was not registered.
    pub fn unregister(&mut self, command: &str) -> bool {
        self.handlers.remove(command).is_some()
    }

    pub fn get(&self, command: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.get(command).cloned()
    }

    pub fn contains(&self, command: &str) -> bool {
        self.handlers.contains_key(command)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered verbs, sorted.
    pub fn commands(&self) -> Vec<&'static str> {
        let mut commands: Vec<_> = self.handlers.keys().copied().collect();
        commands.sort_unstable();
        commands
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.commands())
            .finish()
    }
}

/// Run `handler` for `msg`, applying its routing table and arity first.
///
/// Includes IRC-aware instrumentation: a per-command span and a latency
/// timer recorded on completion.
pub async fn invoke(
    handler: Arc<dyn Handler>,
    cmd_name: &str,
    ctx: &Context<'_>,
    msg: &Message,
) -> HandlerResult {
    match handler.route(ctx.source.kind) {
        Route::Handle => {}
        Route::NotRegistered => return Err(HandlerError::NotRegistered),
        Route::Ignore => {
            debug!(command = %cmd_name, source = ctx.source.kind.as_str(), "Ignoring command");
            return Ok(());
        }
    }

    if msg.arg_count() < handler.min_args() {
        return Err(HandlerError::NeedMoreParams);
    }

    let channel = msg.arg(0).filter(|a| a.is_channel_name());
    let irc_span = spans::command(cmd_name, ctx.source.label(), channel);
    let _timer = CommandTimer::new(cmd_name);

    handler.handle(ctx, msg).instrument(irc_span).await
}
