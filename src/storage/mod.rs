//! # Record Store Trait
//!
//! This is THE contract between the engine and any persistence engine.
//! The engine needs nothing beyond per-record create / read / replace /
//! delete-by-key with existence checks. No cross-record transactions.
//!
//! ## Implementations
//!
//! | Store | Module | Description |
//! |-------|--------|-------------|
//! | `MemoryStore` | `memory` | In-memory for testing/embedding |
//!
//! Remote document stores implement [`RecordStore`] outside this crate and
//! read their address and credentials from [`crate::config::Endpoint`].

pub mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SessionConfig;
use crate::model::LinkClass;
use crate::Result;

pub use memory::MemoryStore;

/// A stored document. Nodes and links are serialized to JSON objects.
pub type Record = serde_json::Value;

// ============================================================================
// Partitions and addresses
// ============================================================================

/// A physical collection in the record store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Partition {
    /// One partition per declared node kind.
    Nodes(String),
    /// One of the four fixed link partitions.
    Links(LinkClass),
}

impl Partition {
    pub fn name(&self) -> &str {
        match self {
            Partition::Nodes(kind) => kind,
            Partition::Links(class) => class.name(),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<LinkClass> for Partition {
    fn from(class: LinkClass) -> Self {
        Partition::Links(class)
    }
}

/// Fully-qualified address of a record: `partition/key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordAddress {
    pub partition: Partition,
    pub key: String,
}

impl RecordAddress {
    pub fn new(partition: Partition, key: impl Into<String>) -> Self {
        Self { partition, key: key.into() }
    }
}

impl fmt::Display for RecordAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition, self.key)
    }
}

// ============================================================================
// RecordStore Trait
// ============================================================================

/// The storage contract consumed by the engine.
///
/// Implementations must make concurrent access to the *same key* safe. The
/// engine adds no locking of its own: two callers upserting one key can
/// interleave read/read/write/write and the second write wins.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Create the partition if it does not exist. Idempotent.
    async fn ensure_partition(&self, partition: &Partition) -> Result<()>;

    /// True if a record exists at `key`.
    async fn exists(&self, partition: &Partition, key: &str) -> Result<bool>;

    /// Read a record. Returns None if not found.
    async fn get(&self, partition: &Partition, key: &str) -> Result<Option<Record>>;

    /// Create a record. Fails with `Error::DuplicateKey` if one exists.
    async fn put(&self, partition: &Partition, key: &str, record: Record) -> Result<()>;

    /// Overwrite an existing record. Fails with `Error::NotFound` if absent.
    async fn replace(&self, partition: &Partition, key: &str, record: Record) -> Result<()>;

    /// Delete a record. Returns true if it existed.
    async fn delete(&self, partition: &Partition, key: &str) -> Result<bool>;

    /// Number of records in a partition.
    async fn count(&self, partition: &Partition) -> Result<u64>;

    /// All keys in a partition, in no particular order.
    async fn keys(&self, partition: &Partition) -> Result<Vec<String>>;

    /// Shut down the store, flushing any pending writes.
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Provisioning
// ============================================================================

/// Every partition a session needs: one per node kind plus the four link
/// partitions.
pub fn partitions_for(config: &SessionConfig) -> Vec<Partition> {
    config
        .node_kinds
        .iter()
        .cloned()
        .map(Partition::Nodes)
        .chain(LinkClass::ALL.into_iter().map(Partition::Links))
        .collect()
}

/// Make sure every partition of the session exists. Called once on open.
pub async fn provision<S: RecordStore>(store: &S, config: &SessionConfig) -> Result<()> {
    for partition in partitions_for(config) {
        store.ensure_partition(&partition).await?;
    }
    debug!(session = %config.name, kinds = config.node_kinds.len(), "partitions provisioned");
    Ok(())
}
