//! ISUPPORT (005) feature token table.

use knockd_proto::isupport::{IsupportBuilder, MAX_TOKENS_PER_LINE};
use knockd_proto::{Command, Message, Prefix, Response};

/// Feature tokens advertised to clients, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IsupportTable {
    tokens: Vec<(String, Option<String>)>,
}

impl IsupportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens that describe the server itself.
    pub fn with_base(network: &str) -> Self {
        let mut table = Self::new();
        table.add("CASEMAPPING", Some("rfc1459"));
        table.add("CHANTYPES", Some("#&"));
        table.add("NETWORK", Some(network));
        table
    }

    /// Add or update a token. Returns true if it was new.
    pub fn add(&mut self, name: &str, value: Option<&str>) -> bool {
        let value = value.map(str::to_string);
        if let Some(entry) = self.tokens.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value;
            return false;
        }
        self.tokens.push((name.to_string(), value));
        true
    }

    /// Remove a token. Returns false if it was not present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|(n, _)| n != name);
        self.tokens.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tokens.iter().any(|(n, _)| n == name)
    }

    /// The value of `name`: `None` if absent, `Some(None)` for a bare token.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.tokens
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token lines, at most [`MAX_TOKENS_PER_LINE`] tokens each.
    pub fn lines(&self) -> Vec<String> {
        self.tokens
            .iter()
            .fold(IsupportBuilder::new(), |b, (name, value)| {
                b.token(name, value.as_deref())
            })
            .build_lines(MAX_TOKENS_PER_LINE)
    }

    /// `RPL_ISUPPORT` replies for `nick`.
    pub fn replies(&self, server_name: &str, nick: &str) -> Vec<Message> {
        self.lines()
            .into_iter()
            .map(|line| {
                let mut params = vec![nick.to_string()];
                params.extend(line.split(' ').map(str::to_string));
                params.push("are supported by this server".to_string());
                Message::from(Command::Response(Response::RPL_ISUPPORT, params))
                    .with_prefix(Prefix::ServerName(server_name.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_are_idempotent() {
        let mut table = IsupportTable::with_base("TestNet");
        let base = table.clone();

        assert!(table.add("KNOCK", None));
        assert!(!table.add("KNOCK", None));
        assert_eq!(table.len(), base.len() + 1);
        assert_eq!(table.get("KNOCK"), Some(None));

        assert!(table.remove("KNOCK"));
        assert!(!table.remove("KNOCK"));
        assert_eq!(table, base);
    }

    #[test]
    fn re_adding_updates_value_in_place() {
        let mut table = IsupportTable::new();
        table.add("NETWORK", Some("Old"));
        table.add("KNOCK", None);
        table.add("NETWORK", Some("New"));
        assert_eq!(table.lines(), vec!["NETWORK=New KNOCK"]);
    }

    #[test]
    fn replies_end_with_trailing_text() {
        let mut table = IsupportTable::new();
        table.add("KNOCK", None);
        let replies = table.replies("irc.test", "alice");
        assert_eq!(replies.len(), 1);
        assert_eq!(
            replies[0].to_string(),
            ":irc.test 005 alice KNOCK :are supported by this server\r\n"
        );
    }
}
