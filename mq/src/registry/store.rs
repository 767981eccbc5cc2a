//! Name -> capability registry

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::traits::Presentable;
use crate::error::PopupError;

/// Write-once map from name to registered show/hide behavior.
#[derive(Default)]
pub(crate) struct Registry {
    entries: HashMap<String, Arc<dyn Presentable>>,
}

impl Registry {
    /// Store a capability pair under `name`, failing if the name is taken.
    pub(crate) fn insert(&mut self, name: String, presentable: Arc<dyn Presentable>) -> Result<(), PopupError> {
        if self.entries.contains_key(&name) {
            debug!(%name, "Registry::insert: duplicate name");
            return Err(PopupError::DuplicateName(name));
        }

        debug!(%name, "Registry::insert: registered");
        self.entries.insert(name, presentable);
        Ok(())
    }

    /// Look up a registration. Absence during a scheduling step is a
    /// self-healing condition handled by the caller, not an error.
    pub(crate) fn get(&self, name: &str) -> Option<Arc<dyn Presentable>> {
        self.entries.get(name).cloned()
    }

    pub(crate) fn clear(&mut self) {
        debug!(count = self.entries.len(), "Registry::clear: called");
        self.entries.clear();
    }
}
