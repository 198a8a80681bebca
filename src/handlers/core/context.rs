//! Command handler context and message sources.

use crate::error::{HandlerError, HandlerResult};
use crate::state::{Matrix, Sid, Uid};
use knockd_proto::Message;
use std::sync::Arc;

/// Who a message came from, as far as routing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A local connection that has not completed registration.
    Unregistered,
    /// A registered local user.
    Client,
    /// A registered local IRC operator.
    Oper,
    /// A directly connected peer server (relayed traffic).
    Server,
    /// A command unwrapped from an ENCAP envelope.
    Encap,
    /// An internal pseudo-session with no connection behind it.
    Dummy,
}

impl SourceKind {
    /// Sources with a local outbound queue.
    pub fn is_local(self) -> bool {
        matches!(self, Self::Unregistered | Self::Client | Self::Oper)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unregistered => "unregistered",
            Self::Client => "client",
            Self::Oper => "oper",
            Self::Server => "server",
            Self::Encap => "encap",
            Self::Dummy => "dummy",
        }
    }
}

/// The origin of one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub kind: SourceKind,
    /// Connection UID for local sources.
    pub uid: Option<Uid>,
    /// SID of the link a relayed message arrived on.
    pub via: Option<Sid>,
}

impl Source {
    pub fn unregistered(uid: &str) -> Self {
        Self::local(SourceKind::Unregistered, uid)
    }

    pub fn client(uid: &str) -> Self {
        Self::local(SourceKind::Client, uid)
    }

    pub fn oper(uid: &str) -> Self {
        Self::local(SourceKind::Oper, uid)
    }

    /// Traffic from the peer `sid`; the acting user comes from the message prefix.
    pub fn server(sid: &str) -> Self {
        Self::relayed(SourceKind::Server, sid)
    }

    pub fn encap(sid: &str) -> Self {
        Self::relayed(SourceKind::Encap, sid)
    }

    pub fn dummy() -> Self {
        Self {
            kind: SourceKind::Dummy,
            uid: None,
            via: None,
        }
    }

    fn local(kind: SourceKind, uid: &str) -> Self {
        Self {
            kind,
            uid: Some(uid.to_string()),
            via: None,
        }
    }

    fn relayed(kind: SourceKind, sid: &str) -> Self {
        Self {
            kind,
            uid: None,
            via: Some(sid.to_string()),
        }
    }

    /// Short identifier for logs.
    pub fn label(&self) -> &str {
        self.uid
            .as_deref()
            .or(self.via.as_deref())
            .unwrap_or(self.kind.as_str())
    }
}

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// Shared server state.
    pub matrix: &'a Arc<Matrix>,
    /// Where the message came from.
    pub source: &'a Source,
}

impl<'a> Context<'a> {
    pub fn new(matrix: &'a Arc<Matrix>, source: &'a Source) -> Self {
        Self { matrix, source }
    }

    pub fn server_name(&self) -> &str {
        &self.matrix.server_info.name
    }

    /// Nick of the local source user, or `*` before registration.
    pub fn source_nick(&self) -> String {
        self.source
            .uid
            .as_deref()
            .and_then(|uid| self.matrix.user(uid))
            .map(|user| user.lock().nick.clone())
            .unwrap_or_else(|| "*".to_string())
    }

    /// Send `msg` back the way the current message came in.
    ///
    /// Local sources get it on their own queue; relayed sources get it on
    /// the link it arrived through.
    pub fn send_to_source(&self, msg: Message) -> HandlerResult {
        let msg = Arc::new(msg);
        if self.source.kind.is_local() {
            let uid = self
                .source
                .uid
                .as_deref()
                .ok_or_else(|| HandlerError::Internal("local source without uid".into()))?;
            let sender = self
                .matrix
                .senders
                .get(uid)
                .map(|s| s.value().clone())
                .ok_or_else(|| HandlerError::Internal(format!("no queue for {uid}")))?;
            sender.try_send(msg)?;
        } else {
            let sid = self
                .source
                .via
                .as_deref()
                .ok_or_else(|| HandlerError::Internal("relayed source without link".into()))?;
            self.matrix.links.send_to(sid, msg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_kinds() {
        assert!(SourceKind::Unregistered.is_local());
        assert!(SourceKind::Oper.is_local());
        assert!(!SourceKind::Server.is_local());
        assert!(!SourceKind::Dummy.is_local());
    }

    #[test]
    fn labels_prefer_uid_then_link() {
        assert_eq!(Source::client("0AAAAAAAB").label(), "0AAAAAAAB");
        assert_eq!(Source::server("1BB").label(), "1BB");
        assert_eq!(Source::dummy().label(), "dummy");
    }
}
