//! Hostmask wildcard matching.

use crate::casemap::irc_lower_char;

/// Match `text` against an IRC glob `pattern` (`*` and `?`), case-folded
/// under RFC 1459 rules.
///
/// ```
/// use knockd_proto::util::wildcard_match;
///
/// assert!(wildcard_match("*!*@*.example.com", "nick!user@HOST.example.com"));
/// assert!(wildcard_match("b?b!*@*", "bob!x@y"));
/// assert!(!wildcard_match("*!admin@*", "nick!user@host"));
/// ```
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().map(irc_lower_char).collect();
    let text: Vec<char> = text.chars().map(irc_lower_char).collect();

    let (mut p, mut t) = (0, 0);
    // Resume point after the most recent '*': (pattern index, text index).
    let mut resume: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                resume = Some((p + 1, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match resume {
                Some((rp, rt)) => {
                    p = rp;
                    t = rt + 1;
                    resume = Some((rp, rt + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Match a `nick!user@host` string against a ban-style mask.
#[inline]
pub fn matches_hostmask(mask: &str, hostmask: &str) -> bool {
    wildcard_match(mask, hostmask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_matches_everything() {
        assert!(wildcard_match("*", ""));
        assert!(wildcard_match("*", "nick!user@host"));
        assert!(wildcard_match("**", "abc"));
    }

    #[test]
    fn question_mark_matches_exactly_one() {
        assert!(wildcard_match("a?c", "abc"));
        assert!(!wildcard_match("a?c", "ac"));
        assert!(!wildcard_match("a?c", "abbc"));
    }

    #[test]
    fn backtracks_across_stars() {
        assert!(wildcard_match("*a*b*c", "xxaxxbxxbxc"));
        assert!(!wildcard_match("*a*b*c", "xxaxxbxx"));
    }

    #[test]
    fn hostmask_matching_is_case_folded() {
        assert!(matches_hostmask("Evil!*@*", "evil!~e@10.0.0.1"));
        assert!(matches_hostmask("*!*@[a]*", "n!u@{A}.net"));
        assert!(!matches_hostmask("evil!*@*", "good!~g@10.0.0.1"));
    }
}
