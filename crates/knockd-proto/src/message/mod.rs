//! Owned IRC messages.

mod parse;

use std::fmt;
use std::str::FromStr;

use crate::command::Command;
use crate::error::MessageParseError;
use crate::prefix::Prefix;

/// A single protocol line: optional source prefix plus a command.
///
/// IRCv3 tags on inbound lines are accepted and dropped; nothing in this
/// core reads or emits them.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    /// Message source (server name, `nick!user@host`, or a UID on server links).
    pub prefix: Option<Prefix>,
    /// The command and its parameters.
    pub command: Command,
}

impl Message {
    /// Create a `NOTICE` with no prefix.
    #[must_use]
    pub fn notice(target: impl Into<String>, text: impl Into<String>) -> Self {
        Command::NOTICE(target.into(), text.into()).into()
    }

    /// Create a `KNOCK` with no prefix.
    #[must_use]
    pub fn knock(channel: impl Into<String>) -> Self {
        Command::KNOCK(channel.into()).into()
    }

    /// Attach a source prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// The verb, uppercased.
    pub fn command_name(&self) -> String {
        self.command.name()
    }

    /// The `n`-th parameter, if present.
    pub fn arg(&self, n: usize) -> Option<&str> {
        self.command.args().get(n).copied()
    }

    /// Number of parameters.
    pub fn arg_count(&self) -> usize {
        self.command.args().len()
    }

    /// Nick (or UID) of a user source.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(Prefix::nick)
    }
}

impl From<Command> for Message {
    fn from(command: Command) -> Self {
        Message {
            prefix: None,
            command,
        }
    }
}

impl FromStr for Message {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = parse::ParsedLine::parse(s)?;
        let prefix = match parsed.prefix {
            Some("") => return Err(MessageParseError::InvalidPrefix(String::new())),
            Some(p) => Some(Prefix::new_from_str(p)),
            None => None,
        };
        Ok(Message {
            prefix,
            command: Command::new(parsed.command, parsed.params.into_vec()),
        })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix)?;
        }
        write!(f, "{}\r\n", self.command)
    }
}
