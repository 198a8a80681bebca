//! Parse errors.

use thiserror::Error;

/// Reasons a raw line could not be turned into a [`Message`](crate::Message).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MessageParseError {
    /// The line was empty (or only whitespace and CRLF).
    #[error("empty message")]
    EmptyMessage,

    /// The command token was missing or not `1*letter / 3digit`.
    #[error("invalid command at byte {position}")]
    InvalidCommand {
        /// Byte offset into the line where parsing stopped.
        position: usize,
    },

    /// A numeric command did not name a known reply.
    #[error("unknown numeric: {0}")]
    UnknownNumeric(String),

    /// The prefix was present but empty.
    #[error("invalid prefix: {0:?}")]
    InvalidPrefix(String),
}
