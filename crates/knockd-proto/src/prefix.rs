//! Message source prefixes.

use std::fmt;

/// The origin of a message: a server name, or a user's `nick!user@host`.
///
/// Server-to-server traffic uses a bare UID (`0AAAAAAAB`) as the source;
/// that parses as a `Nickname` with empty user and host, which is how
/// [`Prefix::nick`] hands it back to routing code.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Prefix {
    /// Server name (e.g. `irc.example.net`).
    ServerName(String),
    /// User source: (nick, user, host).
    Nickname(String, String, String),
}

impl Prefix {
    /// Build a user prefix.
    pub fn new(nick: impl Into<String>, user: impl Into<String>, host: impl Into<String>) -> Self {
        Prefix::Nickname(nick.into(), user.into(), host.into())
    }

    /// Leniently split a raw prefix. A dot before any `!`/`@` marks a server.
    pub fn new_from_str(s: &str) -> Self {
        let (name, rest) = match s.find(['!', '@']) {
            Some(i) => (&s[..i], &s[i..]),
            None => (s, ""),
        };

        if rest.is_empty() {
            return if name.contains('.') {
                Prefix::ServerName(name.to_string())
            } else {
                Prefix::Nickname(name.to_string(), String::new(), String::new())
            };
        }

        let (user, host) = match rest.strip_prefix('!') {
            Some(after_bang) => match after_bang.split_once('@') {
                Some((u, h)) => (u, h),
                None => (after_bang, ""),
            },
            None => ("", rest.trim_start_matches('@')),
        };
        Prefix::Nickname(name.to_string(), user.to_string(), host.to_string())
    }

    /// The nick (or UID) of a user source.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(nick, _, _) if !nick.is_empty() => Some(nick),
            _ => None,
        }
    }

    /// The server name of a server source.
    pub fn server_name(&self) -> Option<&str> {
        match self {
            Prefix::ServerName(name) => Some(name),
            Prefix::Nickname(..) => None,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::ServerName(name) => f.write_str(name),
            Prefix::Nickname(nick, user, host) => {
                f.write_str(nick)?;
                if !user.is_empty() {
                    write!(f, "!{}", user)?;
                }
                if !host.is_empty() {
                    write!(f, "@{}", host)?;
                }
                Ok(())
            }
        }
    }
}
