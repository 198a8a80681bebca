//! Helper functions for IRC command handlers.

use knockd_proto::{Command, Message, Prefix, Response};

/// Helper to create a server reply message (numeric response).
pub fn server_reply(server_name: &str, response: Response, params: Vec<String>) -> Message {
    Message {
        prefix: Some(Prefix::ServerName(server_name.to_string())),
        command: Command::Response(response, params),
    }
}

/// Helper to create a server NOTICE message.
pub fn server_notice<T: Into<String>>(server_name: &str, target: &str, text: T) -> Message {
    Message::notice(target, text).with_prefix(Prefix::ServerName(server_name.to_string()))
}

/// A message sourced from a bare UID, as used on server links.
pub fn uid_message(uid: &str, command: Command) -> Message {
    Message::from(command).with_prefix(Prefix::new(uid, "", ""))
}
