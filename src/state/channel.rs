//! Channel-related types and state.

use crate::state::Uid;
use knockd_proto::util::matches_hostmask;
use std::collections::HashMap;
use std::time::Instant;

use super::clock;

/// An entry in a list (bans, excepts).
#[derive(Debug, Clone)]
pub struct ListEntry {
    pub mask: String,
    pub set_by: String,
    pub set_at: i64,
}

/// Member modes (op, voice, etc.).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemberModes {
    pub owner: bool,  // +q (~)
    pub admin: bool,  // +a (&)
    pub op: bool,     // +o (@)
    pub halfop: bool, // +h (%)
    pub voice: bool,  // +v (+)
}

impl MemberModes {
    /// A plain member with no status.
    pub fn none() -> Self {
        Self::default()
    }

    /// A channel operator (`@`).
    pub fn op() -> Self {
        Self {
            op: true,
            ..Self::default()
        }
    }

    /// Get the highest prefix character for this member.
    /// Priority: ~ > & > @ > % > +
    pub fn prefix_char(&self) -> Option<char> {
        if self.owner {
            Some('~')
        } else if self.admin {
            Some('&')
        } else if self.op {
            Some('@')
        } else if self.halfop {
            Some('%')
        } else if self.voice {
            Some('+')
        } else {
            None
        }
    }

    /// Check if this member has operator privileges (op or higher).
    pub fn has_op_or_higher(&self) -> bool {
        self.owner || self.admin || self.op
    }
}

/// Channel modes that matter to KNOCK.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChannelModes {
    pub invite_only: bool,     // +i
    pub key: Option<String>,   // +k
    pub limit: Option<usize>,  // +l
    pub private: bool,         // +p
    pub secret: bool,          // +s
}

/// A channel and the state KNOCK reads and writes.
#[derive(Debug)]
pub struct Channel {
    /// Name as created (case preserved).
    pub name: String,
    pub modes: ChannelModes,
    /// Members by UID, local and remote alike.
    pub members: HashMap<Uid, MemberModes>,
    pub bans: Vec<ListEntry>,
    pub excepts: Vec<ListEntry>,
    /// When the last KNOCK on this channel was accepted.
    last_knock_at: Option<Instant>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modes: ChannelModes::default(),
            members: HashMap::new(),
            bans: Vec::new(),
            excepts: Vec::new(),
            last_knock_at: None,
        }
    }

    pub fn is_member(&self, uid: &str) -> bool {
        self.members.contains_key(uid)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Whether joining requires something: `+i`, a key, or a full `+l`.
    pub fn is_restricted(&self) -> bool {
        self.modes.invite_only
            || self.modes.key.as_deref().is_some_and(|k| !k.is_empty())
            || self
                .modes
                .limit
                .is_some_and(|limit| limit > 0 && self.member_count() >= limit)
    }

    /// The first ban matching `hostmask` (`nick!user@host`), unless an
    /// exception covers it.
    pub fn matching_ban(&self, hostmask: &str) -> Option<&ListEntry> {
        let ban = self.bans.iter().find(|b| matches_hostmask(&b.mask, hostmask))?;
        if self.excepts.iter().any(|e| matches_hostmask(&e.mask, hostmask)) {
            return None;
        }
        Some(ban)
    }

    pub fn is_banned(&self, hostmask: &str) -> bool {
        self.matching_ban(hostmask).is_some()
    }

    pub fn add_member(&mut self, uid: impl Into<Uid>, modes: MemberModes) {
        self.members.insert(uid.into(), modes);
    }

    pub fn remove_member(&mut self, uid: &str) -> bool {
        self.members.remove(uid).is_some()
    }

    /// Add `+b mask`. Returns false if the mask is already listed.
    pub fn add_ban(&mut self, mask: &str, set_by: &str) -> bool {
        add_list_entry(&mut self.bans, mask, set_by)
    }

    /// Add `+e mask`. Returns false if the mask is already listed.
    pub fn add_except(&mut self, mask: &str, set_by: &str) -> bool {
        add_list_entry(&mut self.excepts, mask, set_by)
    }

    pub fn last_knock_at(&self) -> Option<Instant> {
        self.last_knock_at
    }

    pub fn record_knock(&mut self, now: Instant) {
        clock::bump(&mut self.last_knock_at, now);
    }
}

fn add_list_entry(list: &mut Vec<ListEntry>, mask: &str, set_by: &str) -> bool {
    if list.iter().any(|e| knockd_proto::irc_eq(&e.mask, mask)) {
        return false;
    }
    list.push(ListEntry {
        mask: mask.to_string(),
        set_by: set_by.to_string(),
        set_at: chrono::Utc::now().timestamp(),
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn open_channel_is_not_restricted() {
        let chan = Channel::new("#open");
        assert!(!chan.is_restricted());
    }

    #[test]
    fn each_restriction_counts() {
        let mut chan = Channel::new("#r");
        chan.modes.invite_only = true;
        assert!(chan.is_restricted());

        let mut chan = Channel::new("#k");
        chan.modes.key = Some("hunter2".into());
        assert!(chan.is_restricted());

        let mut chan = Channel::new("#l");
        chan.modes.limit = Some(2);
        chan.add_member("0AAAAAAAA", MemberModes::op());
        assert!(!chan.is_restricted());
        chan.add_member("0AAAAAAAB", MemberModes::none());
        assert!(chan.is_restricted());
    }

    #[test]
    fn private_and_secret_alone_do_not_restrict() {
        let mut chan = Channel::new("#p");
        chan.modes.private = true;
        chan.modes.secret = true;
        assert!(!chan.is_restricted());
    }

    #[test]
    fn exceptions_override_bans() {
        let mut chan = Channel::new("#b");
        assert!(chan.add_ban("*!*@*.example.com", "op"));
        assert!(!chan.add_ban("*!*@*.EXAMPLE.com", "op"));
        assert!(chan.is_banned("alice!al@host.example.com"));
        chan.add_except("alice!*@*", "op");
        assert!(!chan.is_banned("alice!al@host.example.com"));
        assert!(chan.is_banned("bob!bo@host.example.com"));
    }

    #[test]
    fn matching_ban_reports_who_set_it() {
        let mut chan = Channel::new("#b");
        chan.add_ban("*!*@*.example.com", "oscar");
        let ban = chan.matching_ban("bob!bo@host.example.com").unwrap();
        assert_eq!(ban.mask, "*!*@*.example.com");
        assert_eq!(ban.set_by, "oscar");
        assert!(ban.set_at > 0);
        assert!(chan.matching_ban("bob!bo@elsewhere.org").is_none());
    }

    #[test]
    fn knock_timestamp_is_monotonic() {
        let mut chan = Channel::new("#t");
        let t0 = Instant::now();
        chan.record_knock(t0 + Duration::from_secs(3));
        chan.record_knock(t0);
        assert_eq!(chan.last_knock_at(), Some(t0 + Duration::from_secs(3)));
    }

    #[test]
    fn op_or_higher() {
        assert!(MemberModes::op().has_op_or_higher());
        let owner = MemberModes {
            owner: true,
            ..MemberModes::default()
        };
        assert_eq!(owner.prefix_char(), Some('~'));
        assert!(owner.has_op_or_higher());
        let halfop = MemberModes {
            halfop: true,
            ..MemberModes::default()
        };
        assert!(!halfop.has_op_or_higher());
        assert!(!MemberModes::none().has_op_or_higher());
    }
}
