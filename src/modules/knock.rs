//! KNOCK module: the command, the `KNOCK` server capability and the
//! `KNOCK` ISUPPORT token.

use super::{Module, ModuleHost};
use crate::handlers::KnockHandler;
use crate::sync::ServerCaps;
use std::sync::Arc;
use tracing::debug;

/// Token used for the command, the CAPAB entry and the ISUPPORT entry.
const KNOCK: &str = "KNOCK";

pub struct KnockModule;

impl Module for KnockModule {
    fn name(&self) -> &'static str {
        "knock"
    }

    fn activate(&self, host: &mut ModuleHost) {
        let added = host.registry.register(KNOCK, Arc::new(KnockHandler));
        host.capabs.add(KNOCK, ServerCaps::KNOCK, true);
        host.isupport.add(KNOCK, None);
        debug!(fresh = added, "KNOCK registered");
    }

    fn deactivate(&self, host: &mut ModuleHost) {
        let removed = host.registry.unregister(KNOCK);
        host.capabs.remove(KNOCK);
        host.isupport.remove(KNOCK);
        debug!(was_registered = removed, "KNOCK unregistered");
    }
}
