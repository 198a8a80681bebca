//! The Matrix - Central shared state for the server.
//!
//! The Matrix holds users, channels, peer links and server identity in
//! concurrent maps accessible from any task. Records are individually
//! locked; callers that need both take the user lock before the channel
//! lock and never hold either across an `.await`.

use super::clock::{Clock, SystemClock};
use super::{Channel, Sid, Uid, User};
use crate::config::{ChannelConfig, Config, LimitsConfig};
use crate::sync::LinkManager;
use dashmap::DashMap;
use knockd_proto::{Message, irc_to_lower};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// This server's identity.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub network: String,
    pub sid: Sid,
    pub description: String,
}

/// The Matrix - Central shared state container.
pub struct Matrix {
    /// All known users (local and remote), indexed by UID.
    pub users: DashMap<Uid, Arc<Mutex<User>>>,

    /// All channels, indexed by casefolded name.
    pub channels: DashMap<String, Arc<Mutex<Channel>>>,

    /// Outbound queues of local connections, by UID.
    ///
    /// Kept apart from `users` so fan-out never takes another user's lock.
    pub senders: DashMap<Uid, mpsc::Sender<Arc<Message>>>,

    /// Directly connected peer servers.
    pub links: LinkManager,

    /// This server's identity.
    pub server_info: ServerInfo,

    /// KNOCK cooldowns.
    pub channel_config: ChannelConfig,

    /// Queue sizing.
    pub limits: LimitsConfig,

    clock: Arc<dyn Clock>,
}

impl Matrix {
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            users: DashMap::new(),
            channels: DashMap::new(),
            senders: DashMap::new(),
            links: LinkManager::new(),
            server_info: ServerInfo {
                name: config.server.name.clone(),
                network: config.server.network.clone(),
                sid: config.server.sid.clone(),
                description: config.server.description.clone(),
            },
            channel_config: config.channel.clone(),
            limits: config.limits.clone(),
            clock,
        }
    }

    /// Current monotonic time from the injected clock.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Open an outbound queue for a connection that has not registered yet.
    pub fn attach_connection(&self, uid: &str) -> mpsc::Receiver<Arc<Message>> {
        let (tx, rx) = mpsc::channel(self.limits.sendq_capacity.max(1));
        self.senders.insert(uid.to_string(), tx);
        rx
    }

    /// Register a local user and open its outbound queue.
    pub fn add_local_user(&self, user: User) -> mpsc::Receiver<Arc<Message>> {
        let rx = self.attach_connection(&user.uid);
        self.insert_user(user);
        rx
    }

    /// Record a user introduced by a peer server.
    pub fn add_remote_user(&self, user: User) {
        self.insert_user(user);
    }

    fn insert_user(&self, user: User) {
        self.users.insert(user.uid.clone(), Arc::new(Mutex::new(user)));
    }

    /// Forget a user everywhere: directory, queue and memberships.
    pub fn remove_user(&self, uid: &str) {
        self.users.remove(uid);
        self.senders.remove(uid);
        let channels: Vec<_> = self.channels.iter().map(|c| c.value().clone()).collect();
        for channel in channels {
            channel.lock().remove_member(uid);
        }
    }

    pub fn user(&self, uid: &str) -> Option<Arc<Mutex<User>>> {
        self.users.get(uid).map(|u| u.value().clone())
    }

    /// Look a channel up by name (any case).
    pub fn channel(&self, name: &str) -> Option<Arc<Mutex<Channel>>> {
        self.channels.get(&irc_to_lower(name)).map(|c| c.value().clone())
    }

    /// Fetch a channel, creating an empty one if needed.
    pub fn get_or_create_channel(&self, name: &str) -> Arc<Mutex<Channel>> {
        self.channels
            .entry(irc_to_lower(name))
            .or_insert_with(|| Arc::new(Mutex::new(Channel::new(name))))
            .value()
            .clone()
    }

    /// Queue `msg` for a local connection without waiting.
    ///
    /// Returns false when the message was dropped.
    pub fn send_local(&self, uid: &str, msg: Arc<Message>) -> bool {
        let Some(sender) = self.senders.get(uid).map(|s| s.value().clone()) else {
            return false;
        };
        match sender.try_send(msg) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(uid = %uid, "SendQ full, dropping message");
                crate::metrics::record_dropped("user_full");
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(uid = %uid, "Connection closed, dropping message");
                crate::metrics::record_dropped("user_closed");
                false
            }
        }
    }
}
