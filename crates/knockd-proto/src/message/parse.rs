//! Nom-based line splitter.
//!
//! ```text
//! [@tags] [:prefix] <command> [params...] [:trailing]
//! ```

use nom::{
    bytes::complete::{take_till, take_while1},
    character::complete::{char, space0},
    combinator::opt,
    error::ErrorKind,
    sequence::preceded,
    IResult,
};
use smallvec::SmallVec;

use crate::error::MessageParseError;

/// RFC 2812 caps a message at 15 parameters.
const MAX_PARAMS: usize = 15;

fn parse_tags(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_till(|c: char| c == ' '))(input)
}

fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c: char| c != ' '))(input)
}

/// `1*letter / 3digit`
fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_ascii_alphanumeric())(input)?;
    let letters = cmd.chars().all(|c| c.is_ascii_alphabetic());
    let numeric = cmd.len() == 3 && cmd.chars().all(|c| c.is_ascii_digit());
    if letters || numeric {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(input, ErrorKind::AlphaNumeric)))
    }
}

/// Splits the parameter section; consecutive spaces count as one separator.
fn parse_params(mut rest: &str) -> SmallVec<[&str; MAX_PARAMS]> {
    let mut out: SmallVec<[&str; MAX_PARAMS]> = SmallVec::new();

    while out.len() < MAX_PARAMS {
        let trimmed = rest.trim_start_matches(' ');
        if trimmed.len() == rest.len() || trimmed.is_empty() {
            break;
        }
        rest = trimmed;

        if let Some(trailing) = rest.strip_prefix(':') {
            out.push(trailing);
            break;
        }

        let end = rest.find(' ').unwrap_or(rest.len());
        out.push(&rest[..end]);
        rest = &rest[end..];
    }

    out
}

/// A line split into borrowed pieces.
#[derive(Debug, PartialEq)]
pub(crate) struct ParsedLine<'a> {
    pub prefix: Option<&'a str>,
    pub command: &'a str,
    pub params: SmallVec<[&'a str; MAX_PARAMS]>,
}

impl<'a> ParsedLine<'a> {
    pub fn parse(line: &'a str) -> Result<Self, MessageParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        let invalid = |rest: &str| MessageParseError::InvalidCommand {
            position: line.len() - rest.len(),
        };

        let head = |input: &'a str| -> IResult<&'a str, (Option<&'a str>, &'a str)> {
            let (input, _) = opt(parse_tags)(input)?;
            let (input, _) = space0(input)?;
            let (input, prefix) = opt(parse_prefix)(input)?;
            let (input, _) = space0(input)?;
            let (input, command) = parse_command(input)?;
            Ok((input, (prefix, command)))
        };

        let (rest, (prefix, command)) = match head(line) {
            Ok(parsed) => parsed,
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => return Err(invalid(e.input)),
            Err(nom::Err::Incomplete(_)) => return Err(invalid("")),
        };

        // Anything glued to the verb (`KNOCK#a`) is not a valid separator.
        if !rest.is_empty() && !rest.starts_with(' ') {
            return Err(invalid(rest));
        }

        Ok(ParsedLine {
            prefix,
            command,
            params: parse_params(rest),
        })
    }
}
