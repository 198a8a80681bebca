//! Channel name utilities.

/// Maximum channel name length in characters, prefix included.
pub const CHANNEL_MAX_LEN: usize = 50;

/// Extension trait for recognizing channel names.
pub trait ChannelExt {
    /// True if this looks like a channel name: starts with one of `#&+!`, is
    /// at most [`CHANNEL_MAX_LEN`] characters, and has no space, comma, BEL
    /// or NUL.
    fn is_channel_name(&self) -> bool;
}

impl ChannelExt for str {
    fn is_channel_name(&self) -> bool {
        let Some(first) = self.chars().next() else {
            return false;
        };
        matches!(first, '#' | '&' | '+' | '!')
            && self.chars().count() <= CHANNEL_MAX_LEN
            && !self.chars().any(|c| matches!(c, ' ' | ',' | '\x07' | '\0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_channel_prefixes() {
        assert!("#rust".is_channel_name());
        assert!("&local".is_channel_name());
        assert!(!"rust".is_channel_name());
        assert!(!"".is_channel_name());
    }

    #[test]
    fn rejects_forbidden_characters() {
        assert!(!"#a b".is_channel_name());
        assert!(!"#a,b".is_channel_name());
        assert!(!"#a\x07".is_channel_name());
    }

    #[test]
    fn enforces_length_limit() {
        let long = format!("#{}", "x".repeat(CHANNEL_MAX_LEN));
        assert!(!long.as_str().is_channel_name());
        let ok = format!("#{}", "x".repeat(CHANNEL_MAX_LEN - 1));
        assert!(ok.as_str().is_channel_name());
    }
}
