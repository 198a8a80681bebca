//! IRC numeric replies used by the KNOCK extension.

#![allow(non_camel_case_types)]

use std::fmt;
use std::str::FromStr;

use crate::error::MessageParseError;

/// Numeric reply code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    /// 005 - Server supported features (ISUPPORT)
    RPL_ISUPPORT = 5,
    /// 403 - No such channel
    ERR_NOSUCHCHANNEL = 403,
    /// 404 - Cannot send to channel
    ERR_CANNOTSENDTOCHAN = 404,
    /// 421 - Unknown command
    ERR_UNKNOWNCOMMAND = 421,
    /// 451 - You have not registered
    ERR_NOTREGISTERED = 451,
    /// 461 - Not enough parameters
    ERR_NEEDMOREPARAMS = 461,
    /// 711 - Knock delivered
    RPL_KNOCKDLVR = 711,
    /// 712 - Too many knocks
    ERR_TOOMANYKNOCK = 712,
    /// 713 - Channel is open
    ERR_CHANOPEN = 713,
    /// 714 - Already on channel
    ERR_KNOCKONCHAN = 714,
}

impl Response {
    /// The numeric value.
    #[inline]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Look a numeric up by value.
    pub fn from_code(code: u16) -> Option<Response> {
        use Response::*;
        Some(match code {
            5 => RPL_ISUPPORT,
            403 => ERR_NOSUCHCHANNEL,
            404 => ERR_CANNOTSENDTOCHAN,
            421 => ERR_UNKNOWNCOMMAND,
            451 => ERR_NOTREGISTERED,
            461 => ERR_NEEDMOREPARAMS,
            711 => RPL_KNOCKDLVR,
            712 => ERR_TOOMANYKNOCK,
            713 => ERR_CHANOPEN,
            714 => ERR_KNOCKONCHAN,
            _ => return None,
        })
    }

    /// True for 400-599 and the 7xx error numerics.
    pub fn is_error(self) -> bool {
        matches!(self.code(), 400..=599)
            || matches!(
                self,
                Response::ERR_TOOMANYKNOCK | Response::ERR_CHANOPEN | Response::ERR_KNOCKONCHAN
            )
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

impl FromStr for Response {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u16>()
            .ok()
            .and_then(Response::from_code)
            .ok_or_else(|| MessageParseError::UnknownNumeric(s.to_string()))
    }
}
