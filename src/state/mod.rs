//! State management module.
//!
//! Contains the Matrix (shared server state) and related entities.

mod channel;
pub mod clock;
mod matrix;
mod user;

pub use channel::{Channel, ChannelModes, ListEntry, MemberModes};
pub use clock::{Clock, ManualClock, SystemClock};
pub use matrix::{Matrix, ServerInfo};
pub use user::{Origin, User};

/// Unique user identifier (TS6 format: 9 characters).
pub type Uid = String;

/// Server identifier (TS6 format: 3 characters).
pub type Sid = String;
