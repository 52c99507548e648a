//! # Mutation Engine
//!
//! Idempotent node, link and event operations on a [`Spacetime`].
//!
//! ```text
//! caller ─→ sanitize keys ─→ resolve association ─→ derive address
//!        ─→ store.get ─→ absent:  store.put(candidate)
//!                     └→ present: decide (no-op | replace) ─→ store.replace
//! ```
//!
//! Every operation touches exactly one record, except event batches, which
//! touch one record per node and per `then` link. A batch that fails halfway
//! leaves the records it already wrote in place.
//!
//! [`Spacetime`]: crate::Spacetime

mod nodes;
mod links;
mod events;

pub use links::LinkOp;
pub use events::{EventCursor, EventSpec, THEN};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::Value;
use crate::storage::{Record, RecordAddress, RecordStore};
use crate::{Error, Result, Spacetime};

/// Reject weights and payload floats that JSON documents cannot hold.
pub(crate) fn ensure_finite(key: &str, weight: f64, data: Option<&Value>) -> Result<()> {
    if !weight.is_finite() {
        return Err(Error::InvalidWeight { key: key.to_string(), weight });
    }
    if let Some(value) = data.and_then(Value::non_finite) {
        return Err(Error::InvalidPayload { key: key.to_string(), value });
    }
    Ok(())
}

impl<S: RecordStore> Spacetime<S> {
    /// Read and decode the record at `address`, if any.
    pub(crate) async fn read_record<T: DeserializeOwned>(
        &self,
        address: &RecordAddress,
        op: &'static str,
    ) -> Result<Option<T>> {
        let record = self
            .store()
            .get(&address.partition, &address.key)
            .await
            .map_err(Error::store(op, address))?;
        record.map(serde_json::from_value).transpose().map_err(Error::from)
    }

    /// Create a new record at `address`.
    pub(crate) async fn put_record<T: Serialize>(
        &self,
        address: &RecordAddress,
        value: &T,
        op: &'static str,
    ) -> Result<()> {
        let record: Record = serde_json::to_value(value)?;
        self.store()
            .put(&address.partition, &address.key, record)
            .await
            .map_err(Error::store(op, address))
    }

    /// Overwrite the record at `address`.
    pub(crate) async fn replace_record<T: Serialize>(
        &self,
        address: &RecordAddress,
        value: &T,
        op: &'static str,
    ) -> Result<()> {
        let record: Record = serde_json::to_value(value)?;
        self.store()
            .replace(&address.partition, &address.key, record)
            .await
            .map_err(Error::store(op, address))
    }
}
