//! User-related types and state.

use super::clock;
use super::{Sid, Uid};
use std::time::Instant;

/// Where a user is connected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Connected to this server. Only local users are rate limited.
    Local { last_knock_at: Option<Instant> },
    /// Introduced by a peer. `sid` is the user's home server and `via` the
    /// directly connected link its traffic arrives on.
    Remote { sid: Sid, via: Sid },
}

/// A registered user, local or remote.
#[derive(Debug)]
pub struct User {
    pub uid: Uid,
    pub nick: String,
    pub user: String,
    pub host: String,
    pub origin: Origin,
}

impl User {
    pub fn local(uid: impl Into<Uid>, nick: &str, user: &str, host: &str) -> Self {
        Self {
            uid: uid.into(),
            nick: nick.to_string(),
            user: user.to_string(),
            host: host.to_string(),
            origin: Origin::Local {
                last_knock_at: None,
            },
        }
    }

    pub fn remote(uid: impl Into<Uid>, nick: &str, user: &str, host: &str, sid: &str) -> Self {
        Self {
            uid: uid.into(),
            nick: nick.to_string(),
            user: user.to_string(),
            host: host.to_string(),
            origin: Origin::Remote {
                sid: sid.to_string(),
                via: sid.to_string(),
            },
        }
    }

    /// Set the link a remote user is reached through, when its home server
    /// is not directly connected. No effect on local users.
    pub fn behind(mut self, link: &str) -> Self {
        if let Origin::Remote { via, .. } = &mut self.origin {
            *via = link.to_string();
        }
        self
    }

    /// The link a remote user's traffic must arrive on; `None` for local users.
    pub fn uplink(&self) -> Option<&str> {
        match &self.origin {
            Origin::Local { .. } => None,
            Origin::Remote { via, .. } => Some(via.as_str()),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self.origin, Origin::Local { .. })
    }

    /// `nick!user@host`, as matched against ban masks.
    pub fn hostmask(&self) -> String {
        format!("{}!{}@{}", self.nick, self.user, self.host)
    }

    /// Last accepted KNOCK; always `None` for remote users.
    pub fn last_knock_at(&self) -> Option<Instant> {
        match self.origin {
            Origin::Local { last_knock_at } => last_knock_at,
            Origin::Remote { .. } => None,
        }
    }

    /// Remember an accepted KNOCK. Remote users carry no cooldown state.
    pub fn record_knock(&mut self, now: Instant) {
        if let Origin::Local { last_knock_at } = &mut self.origin {
            clock::bump(last_knock_at, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn remote_users_never_record_knocks() {
        let mut u = User::remote("1BBAAAAAA", "carol", "ca", "far.example", "1BB");
        u.record_knock(Instant::now());
        assert_eq!(u.last_knock_at(), None);
        assert!(!u.is_local());
        assert_eq!(u.uplink(), Some("1BB"));
    }

    #[test]
    fn behind_sets_uplink_for_remote_users_only() {
        let far = User::remote("1CCAAAAAA", "dave", "da", "far.example", "1CC").behind("1BB");
        assert_eq!(far.uplink(), Some("1BB"));
        assert!(matches!(far.origin, Origin::Remote { ref sid, .. } if sid == "1CC"));

        let local = User::local("0AAAAAAAB", "alice", "al", "h").behind("1BB");
        assert_eq!(local.uplink(), None);
    }

    #[test]
    fn local_knock_timestamp_is_monotonic() {
        let mut u = User::local("0AAAAAAAB", "alice", "al", "host.example");
        let t0 = Instant::now();
        u.record_knock(t0 + Duration::from_secs(1));
        u.record_knock(t0);
        assert_eq!(u.last_knock_at(), Some(t0 + Duration::from_secs(1)));
        assert_eq!(u.hostmask(), "alice!al@host.example");
    }
}
