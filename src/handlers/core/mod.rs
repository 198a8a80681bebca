//! Core handler infrastructure.
//!
//! This module contains the fundamental types for the command handler
//! system: the [`Handler`] trait with its per-source routing table, the
//! [`Context`] passed to handlers, and the [`Registry`] that maps verbs to
//! handlers.

pub mod context;
pub mod registry;
pub mod traits;

pub use context::{Context, Source, SourceKind};
pub use registry::Registry;
pub use traits::{Handler, Route};
