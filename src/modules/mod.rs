//! Loadable command modules.
//!
//! A module contributes commands, server capabilities and ISUPPORT tokens
//! to a [`ModuleHost`]. Activation and deactivation are idempotent: doing
//! either twice leaves the host exactly as doing it once.

mod knock;

pub use knock::KnockModule;

use crate::handlers::Registry;
use crate::isupport::IsupportTable;
use crate::sync::CapabTable;
use std::collections::BTreeSet;
use tracing::info;

/// A unit of functionality that registers itself with a [`ModuleHost`].
pub trait Module: Send + Sync {
    fn name(&self) -> &'static str;

    /// Add this module's commands, capabilities and feature tokens.
    fn activate(&self, host: &mut ModuleHost);

    /// Remove everything [`Module::activate`] added.
    fn deactivate(&self, host: &mut ModuleHost);
}

/// The tables modules register into.
#[derive(Debug, Default)]
pub struct ModuleHost {
    pub registry: Registry,
    pub capabs: CapabTable,
    pub isupport: IsupportTable,
    loaded: BTreeSet<&'static str>,
}

impl ModuleHost {
    /// A host with no commands and empty tables.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A host seeded with the base capability and ISUPPORT tokens.
    pub fn new(network: &str) -> Self {
        Self {
            registry: Registry::new(),
            capabs: CapabTable::with_base(),
            isupport: IsupportTable::with_base(network),
            loaded: BTreeSet::new(),
        }
    }

    /// Activate `module` unless it is already loaded.
    pub fn load(&mut self, module: &dyn Module) -> bool {
        if !self.loaded.insert(module.name()) {
            return false;
        }
        module.activate(self);
        info!(module = module.name(), "Module loaded");
        true
    }

    /// Deactivate `module` if it is loaded.
    pub fn unload(&mut self, module: &dyn Module) -> bool {
        if !self.loaded.remove(module.name()) {
            return false;
        }
        module.deactivate(self);
        info!(module = module.name(), "Module unloaded");
        true
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }

    /// Loaded module names, sorted.
    pub fn loaded(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.loaded.iter().copied()
    }
}
