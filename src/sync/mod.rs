//! Server-to-server plumbing used by this core.
//!
//! - [`capab`]: the CAPAB token table and per-link negotiated capability sets
//! - [`link`]: connected peer links and capability-gated fan-out

pub mod capab;
pub mod link;

pub use capab::{Capab, CapabTable, ServerCaps};
pub use link::{LinkManager, LinkState};
