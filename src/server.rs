//! Server shell: shared state plus the module tables, and the dispatcher
//! that routes parsed lines to registered handlers.

use crate::config::Config;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::registry;
use crate::handlers::{Context, Source};
use crate::modules::{Module, ModuleHost};
use crate::state::{Clock, Matrix, SystemClock};
use crate::sync::LinkState;
use crate::telemetry::spans;
use knockd_proto::{Command, Message, MessageParseError};
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A server instance.
pub struct Server {
    pub matrix: Arc<Matrix>,
    modules: RwLock<ModuleHost>,
}

impl Server {
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            matrix: Arc::new(Matrix::with_clock(config, clock)),
            modules: RwLock::new(ModuleHost::new(&config.server.network)),
        }
    }

    /// Read access to the module tables.
    pub fn modules(&self) -> RwLockReadGuard<'_, ModuleHost> {
        self.modules.read()
    }

    /// Activate `module` unless it is already loaded.
    pub fn load(&self, module: &dyn Module) -> bool {
        self.modules.write().load(module)
    }

    /// Deactivate `module` if it is loaded.
    pub fn unload(&self, module: &dyn Module) -> bool {
        self.modules.write().unload(module)
    }

    /// Our `CAPAB` line, as sent at link time.
    pub fn capab_message(&self) -> Message {
        let tokens = self
            .modules
            .read()
            .capabs
            .entries()
            .iter()
            .filter(|c| c.advertised)
            .map(|c| c.name.clone())
            .collect();
        Message::from(Command::CAPAB(tokens))
    }

    /// Our ISUPPORT tokens, grouped into 005 lines.
    pub fn isupport_lines(&self) -> Vec<String> {
        self.modules.read().isupport.lines()
    }

    /// Attach a peer link that advertised `capab` during its handshake.
    ///
    /// The link's capabilities are whatever both sides know about now;
    /// modules loaded later do not widen an existing link.
    pub fn link_peer<S: AsRef<str>>(
        &self,
        sid: &str,
        name: &str,
        capab: &[S],
    ) -> mpsc::Receiver<Arc<Message>> {
        let caps = self.modules.read().capabs.negotiate(capab);
        let (tx, rx) = mpsc::channel(self.matrix.limits.sendq_capacity.max(1));
        let _span = spans::peer(sid, name).entered();
        if self.matrix.links.add(LinkState::new(sid, name, caps, tx)).is_some() {
            warn!("Replaced existing link with the same SID");
        }
        info!(caps = ?caps, "Peer linked");
        rx
    }

    pub fn unlink_peer(&self, sid: &str) -> bool {
        self.matrix.links.remove(sid).is_some()
    }

    /// Route one message from `source` to its handler.
    ///
    /// Client-visible failures are answered here and count as handled;
    /// delivery and internal failures are logged and returned.
    pub async fn dispatch(&self, source: &Source, msg: &Message) -> HandlerResult {
        let cmd_name = msg.command_name();
        let handler = self.modules.read().registry.get(&cmd_name);
        let ctx = Context::new(&self.matrix, source);

        let result = match handler {
            Some(handler) => registry::invoke(handler, &cmd_name, &ctx, msg).await,
            None => Err(HandlerError::UnknownCommand(cmd_name.clone())),
        };
        let Err(err) = result else {
            return Ok(());
        };

        crate::metrics::record_command_error(&cmd_name, err.error_code());
        debug!(command = %cmd_name, source = %source.label(), error = %err, "Command error");

        match err.to_irc_reply(ctx.server_name(), &ctx.source_nick(), &cmd_name) {
            Some(reply) if source.kind.is_local() => ctx.send_to_source(reply),
            // Peers get no numerics for malformed or unknown relays.
            Some(_) => Ok(()),
            None => {
                warn!(command = %cmd_name, source = %source.label(), error = %err, "Command failed");
                Err(err)
            }
        }
    }

    /// Parse `line` and dispatch it. Unparseable lines are dropped.
    pub async fn dispatch_line(&self, source: &Source, line: &str) -> HandlerResult {
        match line.parse::<Message>() {
            Ok(msg) => self.dispatch(source, &msg).await,
            Err(MessageParseError::EmptyMessage) => Ok(()),
            Err(e) => {
                debug!(source = %source.label(), error = %e, "Dropping unparseable line");
                crate::metrics::record_command_error("-", "parse_error");
                Ok(())
            }
        }
    }
}
