//! In-memory record store.
//!
//! This is the reference implementation of `RecordStore`.
//! It uses plain HashMaps protected by one RwLock.
//!
//! ## Limitations
//!
//! - **No persistence**: everything is lost on drop.
//! - **Per-call atomicity only**: each method holds the lock for one record
//!   operation. A read followed by a write from the engine is NOT atomic.
//! - **Partitions must be provisioned**: touching a partition that was never
//!   passed to `ensure_partition()` is an `UnknownPartition` error.
//!
//! Use this store for:
//! - Testing the node, link and event engine
//! - Embedding a spacetime in applications that don't need persistence

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use async_trait::async_trait;

use crate::{Error, Result};
use super::{Partition, Record, RecordStore};

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory document storage. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    partitions: RwLock<HashMap<Partition, HashMap<String, Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of all provisioned partitions, sorted.
    pub fn partition_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .partitions
            .read()
            .keys()
            .map(|p| p.name().to_string())
            .collect();
        names.sort();
        names
    }
}

fn unknown(partition: &Partition) -> Error {
    Error::UnknownPartition(format!("partition {partition} is not provisioned"))
}

// ============================================================================
// RecordStore impl
// ============================================================================

#[async_trait]
impl RecordStore for MemoryStore {
    async fn ensure_partition(&self, partition: &Partition) -> Result<()> {
        self.inner
            .partitions
            .write()
            .entry(partition.clone())
            .or_default();
        Ok(())
    }

    async fn exists(&self, partition: &Partition, key: &str) -> Result<bool> {
        let parts = self.inner.partitions.read();
        let records = parts.get(partition).ok_or_else(|| unknown(partition))?;
        Ok(records.contains_key(key))
    }

    async fn get(&self, partition: &Partition, key: &str) -> Result<Option<Record>> {
        let parts = self.inner.partitions.read();
        let records = parts.get(partition).ok_or_else(|| unknown(partition))?;
        Ok(records.get(key).cloned())
    }

    async fn put(&self, partition: &Partition, key: &str, record: Record) -> Result<()> {
        let mut parts = self.inner.partitions.write();
        let records = parts.get_mut(partition).ok_or_else(|| unknown(partition))?;
        if records.contains_key(key) {
            return Err(Error::DuplicateKey(format!("{partition}/{key}")));
        }
        records.insert(key.to_string(), record);
        Ok(())
    }

    async fn replace(&self, partition: &Partition, key: &str, record: Record) -> Result<()> {
        let mut parts = self.inner.partitions.write();
        let records = parts.get_mut(partition).ok_or_else(|| unknown(partition))?;
        let slot = records
            .get_mut(key)
            .ok_or_else(|| Error::NotFound(format!("{partition}/{key}")))?;
        *slot = record;
        Ok(())
    }

    async fn delete(&self, partition: &Partition, key: &str) -> Result<bool> {
        let mut parts = self.inner.partitions.write();
        let records = parts.get_mut(partition).ok_or_else(|| unknown(partition))?;
        Ok(records.remove(key).is_some())
    }

    async fn count(&self, partition: &Partition) -> Result<u64> {
        let parts = self.inner.partitions.read();
        let records = parts.get(partition).ok_or_else(|| unknown(partition))?;
        Ok(records.len() as u64)
    }

    async fn keys(&self, partition: &Partition) -> Result<Vec<String>> {
        let parts = self.inner.partitions.read();
        let records = parts.get(partition).ok_or_else(|| unknown(partition))?;
        Ok(records.keys().cloned().collect())
    }
}
