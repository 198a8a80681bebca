//! The handler trait and per-source routing.

use super::context::{Context, SourceKind};
use crate::error::HandlerResult;
use async_trait::async_trait;
use knockd_proto::Message;

/// What the dispatcher does with a command from a given kind of source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Run the handler.
    Handle,
    /// Answer `ERR_NOTREGISTERED`.
    NotRegistered,
    /// Drop silently.
    Ignore,
}

/// A command handler.
///
/// Each handler declares how many parameters it needs and, per source
/// kind, whether it runs at all. The dispatcher enforces both before
/// [`Handler::handle`] is called.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Minimum number of parameters; fewer yields `ERR_NEEDMOREPARAMS`.
    fn min_args(&self) -> usize {
        0
    }

    /// Routing decision for `kind`.
    fn route(&self, kind: SourceKind) -> Route;

    async fn handle(&self, ctx: &Context<'_>, msg: &Message) -> HandlerResult;
}
