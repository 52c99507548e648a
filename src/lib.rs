//! # sst — Semantic Spacetime graph engine
//!
//! Build and incrementally update a typed knowledge graph idempotently.
//! Repeated calls with the same semantic inputs converge on one stored
//! record, and every link is classed into one of four semantic partitions:
//! `Near`, `Follows`, `Contains`, `Expresses`.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `RecordStore` is the contract between engine and storage
//! 2. **Derived identity**: node and link keys are pure functions of their
//!    semantic inputs, so a write can always find its previous version
//! 3. **Session-owned state**: the association registry and the event cursor
//!    belong to one `Spacetime`, never to the process
//! 4. **Result-first**: every operation returns `Result`; the panicking
//!    variants live in [`must`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sst::{SessionConfig, Spacetime, Value};
//!
//! # async fn example() -> sst::Result<()> {
//! let config = SessionConfig::new(["Person", "Country"]);
//! let st = Spacetime::open_memory(config).await?;
//!
//! let alice = st.create_node("Person", "alice", None, 1.0).await?;
//! let france = st.create_node("Country", "france", Some(Value::from("Europe")), 1.0).await?;
//!
//! st.create_link(&alice, "related", &france, None, 1.0).await?;
//! let link = st.increment_link(&alice, "related", &france, None).await?;
//! assert_eq!(link.weight, 2.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Every operation is a short read-then-maybe-write against the store. The
//! engine takes no locks around that sequence: two callers upserting the same
//! key may interleave and the last write wins.

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod registry;
pub mod storage;
pub mod config;
pub mod engine;
pub mod must;

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    link_key, sanitize, Association, DataMap, Link, LinkClass, Node, NodeRef,
    PayloadComparator, SemanticType, StructuralEq, Value,
};

// ============================================================================
// Re-exports: Storage, config, engine
// ============================================================================

pub use storage::{MemoryStore, Partition, Record, RecordAddress, RecordStore};
pub use config::{Endpoint, SessionConfig};
pub use registry::AssociationRegistry;
pub use engine::{EventCursor, EventSpec, LinkOp};
pub use must::Must;

// ============================================================================
// Top-level Spacetime handle
// ============================================================================

/// The primary entry point. A `Spacetime` wraps a record store and owns the
/// session's association registry and event cursor.
pub struct Spacetime<S: RecordStore> {
    store: S,
    config: SessionConfig,
    registry: RwLock<AssociationRegistry>,
    comparator: Arc<dyn PayloadComparator>,
    cursor: Mutex<EventCursor>,
}

impl<S: RecordStore> Spacetime<S> {
    /// Open a session: validate the config, build the registry and
    /// provision every partition.
    pub async fn open(store: S, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let registry = match &config.associations {
            Some(table) => AssociationRegistry::from_table(table.iter().cloned())?,
            None => AssociationRegistry::with_defaults(),
        };
        storage::provision(&store, &config).await?;
        debug!(session = %config.name, associations = registry.len(), "spacetime opened");
        Ok(Self {
            store,
            config,
            registry: RwLock::new(registry),
            comparator: Arc::new(StructuralEq),
            cursor: Mutex::new(EventCursor::Start),
        })
    }

    /// Replace the payload comparator used to detect unchanged writes.
    pub fn with_comparator(mut self, comparator: impl PayloadComparator + 'static) -> Self {
        self.comparator = Arc::new(comparator);
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Access the underlying store (for advanced use).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a relation for this session only.
    pub fn create_association(&self, association: Association) -> Result<()> {
        self.registry.write().register(association)
    }

    /// Look up a relation by name.
    pub fn association(&self, name: &str) -> Result<Association> {
        self.registry.read().resolve(name).cloned()
    }

    /// Snapshot of every registered relation.
    pub fn associations(&self) -> Vec<Association> {
        self.registry.read().iter().cloned().collect()
    }

    /// Panicking variants of every operation.
    pub fn must(&self) -> Must<'_, S> {
        Must::new(self)
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.store.shutdown().await
    }

    pub(crate) fn comparator(&self) -> &dyn PayloadComparator {
        self.comparator.as_ref()
    }
}

/// In-memory spacetime for testing and embedding.
impl Spacetime<MemoryStore> {
    pub async fn open_memory(config: SessionConfig) -> Result<Self> {
        Self::open(MemoryStore::new(), config).await
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("association conflict on {key}: cannot register {attempted:?}, {existing:?} is already registered")]
    AssociationConflict {
        key: String,
        existing: Box<Association>,
        attempted: Box<Association>,
    },

    #[error("Unknown association: {0}")]
    UnknownAssociation(String),

    #[error("Unknown partition: {0}")]
    UnknownPartition(String),

    #[error("Nil reference: {0}")]
    NilReference(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Negative weight {weight} rejected for new link {key}")]
    NegativeWeight { key: String, weight: f64 },

    #[error("Invalid weight {weight} for {key}: weights must be finite")]
    InvalidWeight { key: String, weight: f64 },

    #[error("Invalid payload for {key}: non-finite float {value}")]
    InvalidPayload { key: String, value: f64 },

    #[error("Store error: failed to {op} {address}: {source}")]
    StoreError {
        op: &'static str,
        address: RecordAddress,
        #[source]
        source: Box<Error>,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap a record store failure with the operation and address.
    pub(crate) fn store<'a>(op: &'static str, address: &'a RecordAddress) -> impl FnOnce(Error) -> Error + 'a {
        move |source| Error::StoreError {
            op,
            address: address.clone(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
