//! # knockd-proto
//!
//! The slice of the IRC wire protocol the KNOCK extension core speaks:
//! line parsing and serialization, the numerics it replies with, RFC 1459
//! casemapping, hostmask wildcards and ISUPPORT token rendering.
//!
//! ```rust
//! use knockd_proto::{Command, Message};
//!
//! let msg: Message = ":0AAAAAAAB KNOCK #rust".parse().expect("valid line");
//! assert_eq!(msg.command, Command::KNOCK("#rust".to_string()));
//! assert_eq!(msg.to_string(), ":0AAAAAAAB KNOCK #rust\r\n");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod chan;
pub mod command;
pub mod error;
pub mod isupport;
pub mod message;
pub mod prefix;
pub mod response;
pub mod util;

pub use self::casemap::{irc_eq, irc_lower_char, irc_to_lower};
pub use self::chan::ChannelExt;
pub use self::command::Command;
pub use self::error::MessageParseError;
pub use self::isupport::IsupportBuilder;
pub use self::message::Message;
pub use self::prefix::Prefix;
pub use self::response::Response;
