//! Server capability (CAPAB) registry.
//!
//! Each link negotiates a [`ServerCaps`] set at handshake time from the
//! tokens both sides advertise. Commands that only some peers understand
//! are relayed to links whose set contains the matching bit.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bit set of negotiated server capabilities.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ServerCaps(u32);

impl ServerCaps {
    pub const NONE: ServerCaps = ServerCaps(0);
    /// Quit storm suppression.
    pub const QS: ServerCaps = ServerCaps(1 << 0);
    /// Ban exceptions (`+e`).
    pub const EX: ServerCaps = ServerCaps(1 << 1);
    /// Invite exceptions (`+I`).
    pub const IE: ServerCaps = ServerCaps(1 << 2);
    /// End-of-burst marker.
    pub const EOB: ServerCaps = ServerCaps(1 << 3);
    /// Topic burst.
    pub const TBURST: ServerCaps = ServerCaps(1 << 4);
    /// ENCAP envelope.
    pub const ENCAP: ServerCaps = ServerCaps(1 << 5);
    /// Relayed `KNOCK`.
    pub const KNOCK: ServerCaps = ServerCaps(1 << 6);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set in `self`.
    pub const fn contains(self, other: ServerCaps) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

impl BitOr for ServerCaps {
    type Output = ServerCaps;

    fn bitor(self, rhs: ServerCaps) -> ServerCaps {
        ServerCaps(self.0 | rhs.0)
    }
}

impl BitOrAssign for ServerCaps {
    fn bitor_assign(&mut self, rhs: ServerCaps) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ServerCaps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServerCaps({:#x})", self.0)
    }
}

/// One row of the capability table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capab {
    pub name: String,
    pub cap: ServerCaps,
    /// Whether we list the token in our own CAPAB line.
    pub advertised: bool,
}

/// Capability tokens this server knows, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabTable {
    entries: Vec<Capab>,
}

impl CapabTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tokens every TS6 link speaks, independent of loaded modules.
    pub fn with_base() -> Self {
        let mut table = Self::new();
        for (name, cap) in [
            ("QS", ServerCaps::QS),
            ("EX", ServerCaps::EX),
            ("IE", ServerCaps::IE),
            ("EOB", ServerCaps::EOB),
            ("TBURST", ServerCaps::TBURST),
            ("ENCAP", ServerCaps::ENCAP),
        ] {
            table.add(name, cap, true);
        }
        table
    }

    /// Register a token. Re-adding a known name updates it in place.
    ///
    /// Returns true if the name was new.
    pub fn add(&mut self, name: &str, cap: ServerCaps, advertised: bool) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            entry.cap = cap;
            entry.advertised = advertised;
            return false;
        }
        self.entries.push(Capab {
            name: name.to_string(),
            cap,
            advertised,
        });
        true
    }

    /// Forget a token. Returns false if it was not registered.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        self.entries.len() != before
    }

    pub fn find(&self, name: &str) -> Option<ServerCaps> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.cap)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Capab] {
        &self.entries
    }

    /// Our CAPAB line payload: advertised tokens, space separated.
    pub fn advertisement(&self) -> String {
        self.entries
            .iter()
            .filter(|e| e.advertised)
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Capabilities shared with a peer that advertised `tokens`.
    ///
    /// Unknown tokens are ignored; token names are case-sensitive.
    pub fn negotiate<S: AsRef<str>>(&self, tokens: &[S]) -> ServerCaps {
        tokens
            .iter()
            .filter_map(|t| self.find(t.as_ref()))
            .fold(ServerCaps::NONE, |acc, cap| acc | cap)
    }
}
