//! IRC commands and their wire form.

use std::fmt::{self, Write};

use crate::response::Response;

/// A command with its parameters.
///
/// Only the verbs this core produces or consumes get their own variant;
/// anything else is carried as [`Command::Raw`] so it can still be routed
/// (or rejected) by verb name.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Command {
    /// `KNOCK <channel>`
    KNOCK(String),
    /// `NOTICE <target> :<text>`
    NOTICE(String, String),
    /// `CAPAB :<token> <token> ...`
    CAPAB(Vec<String>),
    /// Numeric reply with its parameters (first is the target).
    Response(Response, Vec<String>),
    /// Any other verb, uppercased, with raw parameters.
    Raw(String, Vec<String>),
}

impl Command {
    /// Build a command from a verb and its parameters.
    ///
    /// `KNOCK` without an argument stays `Raw` so handlers can see that the
    /// argument is missing and answer with `ERR_NEEDMOREPARAMS`.
    pub fn new(verb: &str, args: Vec<&str>) -> Command {
        let verb = verb.to_ascii_uppercase();
        if let Ok(response) = verb.parse::<Response>() {
            return Command::Response(response, owned(args));
        }

        match verb.as_str() {
            "KNOCK" if !args.is_empty() => Command::KNOCK(args[0].to_string()),
            "NOTICE" if args.len() == 2 => Command::NOTICE(args[0].to_string(), args[1].to_string()),
            "CAPAB" => Command::CAPAB(
                args.iter()
                    .flat_map(|a| a.split_ascii_whitespace())
                    .map(str::to_string)
                    .collect(),
            ),
            _ => Command::Raw(verb, owned(args)),
        }
    }

    /// The verb, uppercased (numerics render as three digits).
    pub fn name(&self) -> String {
        match self {
            Command::KNOCK(_) => "KNOCK".to_string(),
            Command::NOTICE(..) => "NOTICE".to_string(),
            Command::CAPAB(_) => "CAPAB".to_string(),
            Command::Response(resp, _) => resp.to_string(),
            Command::Raw(verb, _) => verb.clone(),
        }
    }

    /// The parameters as borrowed strings, in wire order.
    pub fn args(&self) -> Vec<&str> {
        match self {
            Command::KNOCK(channel) => vec![channel.as_str()],
            Command::NOTICE(target, text) => vec![target.as_str(), text.as_str()],
            Command::CAPAB(tokens) => tokens.iter().map(String::as_str).collect(),
            Command::Response(_, args) | Command::Raw(_, args) => {
                args.iter().map(String::as_str).collect()
            }
        }
    }
}

fn owned(args: Vec<&str>) -> Vec<String> {
    args.into_iter().map(str::to_string).collect()
}

/// True when a final parameter must be sent with a leading `:`.
pub fn needs_colon_prefix(arg: &str) -> bool {
    arg.is_empty() || arg.contains(' ') || arg.starts_with(':')
}

fn write_middle(f: &mut fmt::Formatter<'_>, args: &[&str]) -> fmt::Result {
    for arg in args {
        f.write_char(' ')?;
        f.write_str(arg)?;
    }
    Ok(())
}

fn write_trailing(f: &mut fmt::Formatter<'_>, arg: &str, force_colon: bool) -> fmt::Result {
    f.write_char(' ')?;
    if force_colon || needs_colon_prefix(arg) {
        f.write_char(':')?;
    }
    f.write_str(arg)
}

/// Writes `args` with the last one treated as the trailing parameter.
fn write_args(f: &mut fmt::Formatter<'_>, args: &[&str], force_colon: bool) -> fmt::Result {
    match args.split_last() {
        Some((last, middle)) => {
            write_middle(f, middle)?;
            write_trailing(f, last, force_colon)
        }
        None => Ok(()),
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::KNOCK(channel) => {
                f.write_str("KNOCK")?;
                write_args(f, &[channel.as_str()], false)
            }
            Command::NOTICE(target, text) => {
                f.write_str("NOTICE")?;
                write_args(f, &[target.as_str(), text.as_str()], true)
            }
            Command::CAPAB(tokens) => {
                f.write_str("CAPAB")?;
                write_trailing(f, &tokens.join(" "), true)
            }
            Command::Response(resp, args) => {
                write!(f, "{}", resp)?;
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                // Bare target-only numerics keep the target unprefixed.
                write_args(f, &args, args.len() > 1)
            }
            Command::Raw(verb, args) => {
                f.write_str(verb)?;
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                write_args(f, &args, false)
            }
        }
    }
}
