//! Connected peer links.

use super::capab::ServerCaps;
use crate::state::Sid;
use dashmap::DashMap;
use knockd_proto::Message;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Represents the state of a link to a peer server.
#[derive(Debug, Clone)]
pub struct LinkState {
    /// SID of the directly connected peer.
    pub sid: Sid,
    /// The name of the peer server.
    pub name: String,
    /// Capabilities negotiated during the handshake.
    pub caps: ServerCaps,
    /// The channel to send messages to this peer.
    pub tx: mpsc::Sender<Arc<Message>>,
    /// Time when the connection was established.
    pub connected_at: Instant,
}

impl LinkState {
    pub fn new(sid: &str, name: &str, caps: ServerCaps, tx: mpsc::Sender<Arc<Message>>) -> Self {
        Self {
            sid: sid.to_string(),
            name: name.to_string(),
            caps,
            tx,
            connected_at: Instant::now(),
        }
    }

    pub fn supports(&self, cap: ServerCaps) -> bool {
        self.caps.contains(cap)
    }

    /// Queue `msg` without waiting. Returns false if it was dropped.
    pub fn try_send(&self, msg: Arc<Message>) -> bool {
        match self.tx.try_send(msg) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(peer = %self.name, sid = %self.sid, "Link sendq full, dropping message");
                crate::metrics::record_dropped("link_full");
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(peer = %self.name, sid = %self.sid, "Link closed, dropping message");
                crate::metrics::record_dropped("link_closed");
                false
            }
        }
    }
}

/// Directly connected peers, by SID.
#[derive(Debug, Default)]
pub struct LinkManager {
    links: DashMap<Sid, LinkState>,
}

impl LinkManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a link, replacing any previous link with the same SID.
    pub fn add(&self, link: LinkState) -> Option<LinkState> {
        self.links.insert(link.sid.clone(), link)
    }

    pub fn remove(&self, sid: &str) -> Option<LinkState> {
        self.links.remove(sid).map(|(_, link)| link)
    }

    pub fn get(&self, sid: &str) -> Option<LinkState> {
        self.links.get(sid).map(|l| l.value().clone())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Send to one link. Returns the sender error so callers can surface it.
    pub fn send_to(&self, sid: &str, msg: Arc<Message>) -> Result<(), TrySendError<Arc<Message>>> {
        match self.links.get(sid) {
            Some(link) => link.tx.try_send(msg),
            None => Err(TrySendError::Closed(msg)),
        }
    }

    /// Send `msg` to every link supporting `cap`, skipping `exclude`.
    ///
    /// Returns how many links accepted the message.
    pub fn broadcast_capable(&self, cap: ServerCaps, exclude: Option<&str>, msg: &Arc<Message>) -> usize {
        self.links
            .iter()
            .filter(|link| exclude != Some(link.sid.as_str()))
            .filter(|link| link.supports(cap))
            .filter(|link| link.try_send(Arc::clone(msg)))
            .count()
    }
}
