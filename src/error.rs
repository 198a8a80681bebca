//! Error hierarchy for command handling.
//!
//! [`KnockError`] covers every way a KNOCK request can be refused; each
//! variant maps to exactly one numeric reply. [`HandlerError`] covers the
//! dispatcher-level failures shared by all commands.

use std::fmt;
use std::sync::Arc;

use knockd_proto::{Command, Message, Prefix, Response};
use thiserror::Error;
use tokio::sync::mpsc;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command dispatch.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("not registered")]
    NotRegistered,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("send error: {0}")]
    Send(#[from] mpsc::error::TrySendError<Arc<Message>>),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams => "need_more_params",
            Self::NotRegistered => "not_registered",
            Self::UnknownCommand(_) => "unknown_command",
            Self::Send(_) => "send_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Convert to an IRC error reply message.
    ///
    /// Returns `None` for errors that don't warrant a client-visible reply.
    pub fn to_irc_reply(&self, server_name: &str, nick: &str, cmd_name: &str) -> Option<Message> {
        let params = match self {
            Self::NeedMoreParams => vec![
                nick.to_string(),
                cmd_name.to_string(),
                "Not enough parameters".to_string(),
            ],
            Self::NotRegistered => vec![nick.to_string(), "You have not registered".to_string()],
            Self::UnknownCommand(cmd) => vec![
                nick.to_string(),
                cmd.clone(),
                "Unknown command".to_string(),
            ],
            Self::Send(_) | Self::Internal(_) => return None,
        };
        let response = match self {
            Self::NeedMoreParams => Response::ERR_NEEDMOREPARAMS,
            Self::NotRegistered => Response::ERR_NOTREGISTERED,
            _ => Response::ERR_UNKNOWNCOMMAND,
        };
        Some(reply(server_name, response, params))
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Knock Errors (request pipeline)
// ============================================================================

/// Which cooldown refused a knock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnockScope {
    /// The requester knocked too recently (anywhere).
    User,
    /// Somebody knocked on this channel too recently.
    Channel,
}

impl KnockScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Channel => "channel",
        }
    }
}

impl fmt::Display for KnockScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a KNOCK request is refused.
///
/// None of these are fatal: the requester gets one numeric and nothing else
/// happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KnockError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("no such channel: {0}")]
    NoSuchChannel(String),

    #[error("already on channel {0}")]
    KnockOnChan(String),

    #[error("channel {0} is open")]
    ChanOpen(String),

    #[error("cannot send to channel {0}")]
    CannotSendToChan(String),

    #[error("too many knocks on {channel} ({scope})")]
    TooManyKnocks { channel: String, scope: KnockScope },
}

impl KnockError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams => "need_more_params",
            Self::NoSuchChannel(_) => "no_such_channel",
            Self::KnockOnChan(_) => "knock_on_chan",
            Self::ChanOpen(_) => "chan_open",
            Self::CannotSendToChan(_) => "cannot_send_to_chan",
            Self::TooManyKnocks {
                scope: KnockScope::User,
                ..
            } => "too_many_knocks_user",
            Self::TooManyKnocks {
                scope: KnockScope::Channel,
                ..
            } => "too_many_knocks_channel",
        }
    }

    /// The numeric this refusal is answered with.
    pub fn response(&self) -> Response {
        match self {
            Self::NeedMoreParams => Response::ERR_NEEDMOREPARAMS,
            Self::NoSuchChannel(_) => Response::ERR_NOSUCHCHANNEL,
            Self::KnockOnChan(_) => Response::ERR_KNOCKONCHAN,
            Self::ChanOpen(_) => Response::ERR_CHANOPEN,
            Self::CannotSendToChan(_) => Response::ERR_CANNOTSENDTOCHAN,
            Self::TooManyKnocks { .. } => Response::ERR_TOOMANYKNOCK,
        }
    }

    /// Build the numeric reply for `target` (nick for local users, UID for remote).
    pub fn to_irc_reply(&self, server: &str, target: &str) -> Message {
        let target = target.to_string();
        let params = match self {
            Self::NeedMoreParams => vec![
                target,
                "KNOCK".to_string(),
                "Not enough parameters".to_string(),
            ],
            Self::NoSuchChannel(chan) => {
                vec![target, chan.clone(), "No such channel".to_string()]
            }
            Self::KnockOnChan(chan) => vec![
                target,
                chan.clone(),
                "You are already on that channel".to_string(),
            ],
            Self::ChanOpen(chan) => vec![target, chan.clone(), "Channel is open".to_string()],
            Self::CannotSendToChan(chan) => vec![
                target,
                chan.clone(),
                "Cannot send to channel".to_string(),
            ],
            Self::TooManyKnocks { channel, scope } => vec![
                target,
                channel.clone(),
                format!("Too many KNOCKs ({}).", scope),
            ],
        };
        reply(server, self.response(), params)
    }
}

fn reply(server: &str, response: Response, params: Vec<String>) -> Message {
    Message::from(Command::Response(response, params))
        .with_prefix(Prefix::ServerName(server.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knock_error_codes_are_distinct_per_scope() {
        let user = KnockError::TooManyKnocks {
            channel: "#a".into(),
            scope: KnockScope::User,
        };
        let chan = KnockError::TooManyKnocks {
            channel: "#a".into(),
            scope: KnockScope::Channel,
        };
        assert_eq!(user.error_code(), "too_many_knocks_user");
        assert_eq!(chan.error_code(), "too_many_knocks_channel");
        assert_eq!(user.response(), chan.response());
    }

    #[test]
    fn cooldown_reply_names_scope() {
        let err = KnockError::TooManyKnocks {
            channel: "#ops".into(),
            scope: KnockScope::Channel,
        };
        assert_eq!(
            err.to_irc_reply("irc.test", "alice").to_string(),
            ":irc.test 712 alice #ops :Too many KNOCKs (channel).\r\n"
        );
    }

    #[test]
    fn need_more_params_reply_names_command() {
        let msg = KnockError::NeedMoreParams.to_irc_reply("irc.test", "alice");
        assert_eq!(
            msg.to_string(),
            ":irc.test 461 alice KNOCK :Not enough parameters\r\n"
        );
    }

    #[test]
    fn every_knock_error_maps_to_expected_numeric() {
        let cases = [
            (KnockError::NoSuchChannel("#a".into()), 403),
            (KnockError::KnockOnChan("#a".into()), 714),
            (KnockError::ChanOpen("#a".into()), 713),
            (KnockError::CannotSendToChan("#a".into()), 404),
        ];
        for (err, code) in cases {
            assert_eq!(err.response().code(), code);
        }
    }

    #[test]
    fn infrastructure_errors_have_no_reply() {
        let err = HandlerError::Internal("boom".into());
        assert!(err.to_irc_reply("irc.test", "alice", "KNOCK").is_none());
        assert_eq!(err.error_code(), "internal_error");
    }

    #[test]
    fn not_registered_reply() {
        let msg = HandlerError::NotRegistered
            .to_irc_reply("irc.test", "*", "KNOCK")
            .unwrap();
        assert_eq!(msg.to_string(), ":irc.test 451 * :You have not registered\r\n");
    }
}
