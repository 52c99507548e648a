//! # Association Registry
//!
//! Maps a relation name to its [`Association`]. Each session owns its own
//! registry, built either from a caller-supplied table or from a fresh copy
//! of the default table, so registering on one session never leaks into
//! another.

use hashbrown::HashMap;
use tracing::debug;

use crate::model::{default_associations, sanitize, Association};
use crate::{Error, Result};

/// Per-session association table. Keys are unique and sanitized.
#[derive(Debug, Clone, Default)]
pub struct AssociationRegistry {
    by_key: HashMap<String, Association>,
}

impl AssociationRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with the built-in table.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for association in default_associations() {
            registry.by_key.insert(association.key.clone(), association);
        }
        registry
    }

    /// A registry holding exactly `table`, replacing the defaults.
    ///
    /// Fails with [`Error::AssociationConflict`] if two rows sanitize to the
    /// same key with different contents.
    pub fn from_table(table: impl IntoIterator<Item = Association>) -> Result<Self> {
        let mut registry = Self::new();
        for association in table {
            registry.register(association)?;
        }
        Ok(registry)
    }

    /// Register an association under its sanitized key.
    ///
    /// Re-registering an identical association is a no-op.
    pub fn register(&mut self, association: Association) -> Result<()> {
        let association = association.sanitized();
        match self.by_key.get(&association.key) {
            None => {
                debug!(key = %association.key, stype = %association.semantic_type, "association registered");
                self.by_key.insert(association.key.clone(), association);
                Ok(())
            }
            Some(existing) if *existing == association => Ok(()),
            Some(existing) => Err(Error::AssociationConflict {
                key: association.key.clone(),
                existing: Box::new(existing.clone()),
                attempted: Box::new(association),
            }),
        }
    }

    /// Look up a relation by name. The name is sanitized first.
    pub fn resolve(&self, name: &str) -> Result<&Association> {
        let key = sanitize(name);
        self.by_key
            .get(&key)
            .ok_or(Error::UnknownAssociation(key))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_key.contains_key(&sanitize(name))
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Association> {
        self.by_key.values()
    }
}
