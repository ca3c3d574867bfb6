//! Named registries owned by an explicit container.
//!
//! Asking for the same name twice yields the same registry; different names
//! yield independent ones. Nothing is evicted until the container is cleared
//! or dropped.

use crate::registry::Registry;
use std::collections::HashMap;
use tracing::debug;

/// A name → [`Registry`] table with create-on-first-use semantics.
#[derive(Debug, Default)]
pub struct Instances {
    registries: HashMap<String, Registry>,
}

impl Instances {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry called `name`, created empty on first request.
    pub fn instance(&mut self, name: &str) -> &mut Registry {
        if !self.registries.contains_key(name) {
            debug!(name, "creating named registry");
        }
        self.registries.entry(name.to_owned()).or_default()
    }

    /// The registry called `name`, if it has been created.
    pub fn get(&self, name: &str) -> Option<&Registry> {
        self.registries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.registries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }

    /// Drop every registry.
    pub fn clear(&mut self) {
        self.registries.clear();
    }
}
