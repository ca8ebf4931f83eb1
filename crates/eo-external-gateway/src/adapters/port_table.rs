//! In-memory port registry.
//!
//! For hosts that already know which application owns which local port,
//! e.g. because applications register when they connect.

use crate::ports::{ResolveError, SenderResolver};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct PortTable {
    entries: RwLock<HashMap<u16, String>>,
}

impl PortTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` as the owner of `port`, replacing any previous owner.
    pub fn register(&self, port: u16, name: impl Into<String>) {
        let name = name.into();
        debug!(port, name = %name, "Registered port owner");
        self.entries.write().insert(port, name);
    }

    pub fn unregister(&self, port: u16) -> Option<String> {
        self.entries.write().remove(&port)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SenderResolver for PortTable {
    fn name_by_port(&self, port: u16) -> Result<String, ResolveError> {
        self.entries
            .read()
            .get(&port)
            .cloned()
            .ok_or(ResolveError::NotFound(port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let table = PortTable::new();
        table.register(41000, "hello-app");

        assert_eq!(table.name_by_port(41000).unwrap(), "hello-app");
        assert!(matches!(
            table.name_by_port(41001),
            Err(ResolveError::NotFound(41001))
        ));
    }

    #[test]
    fn test_reregister_replaces_owner() {
        let table = PortTable::new();
        table.register(41000, "first");
        table.register(41000, "second");

        assert_eq!(table.len(), 1);
        assert_eq!(table.name_by_port(41000).unwrap(), "second");
    }

    #[test]
    fn test_unregister() {
        let table = PortTable::new();
        table.register(41000, "hello-app");

        assert_eq!(table.unregister(41000).as_deref(), Some("hello-app"));
        assert!(table.is_empty());
        assert!(table.name_by_port(41000).is_err());
    }
}
