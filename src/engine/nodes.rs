//! Node store: idempotent create/update of typed vertices.

use tracing::{debug, trace};

use crate::model::{is_blank, sanitize, Node, NodeRef, Value};
use crate::storage::{Partition, RecordAddress, RecordStore};
use crate::{Error, Result, Spacetime};

use super::ensure_finite;

impl<S: RecordStore> Spacetime<S> {
    /// Idempotently create a node of the given kind.
    ///
    /// - absent: stored verbatim
    /// - present, no data and zero weight: existence probe, never writes;
    ///   returns the stored node
    /// - present, data or weight differ: replaced wholesale (no merge)
    /// - present and unchanged: no write
    ///
    /// An empty key is a [`Error::NilReference`]. A NaN or infinite weight or
    /// payload float is rejected before anything is read or written.
    ///
    /// Returns the node as stored after the call.
    pub async fn create_node(
        &self,
        kind: &str,
        key: &str,
        data: Option<Value>,
        weight: f64,
    ) -> Result<Node> {
        let partition = self.node_partition(kind)?;
        let node = Node {
            key: sanitize(key),
            kind: kind.to_string(),
            data,
            weight,
        };
        if node.key.is_empty() {
            return Err(Error::NilReference(format!("node of kind {kind} has an empty key")));
        }
        let address = RecordAddress::new(partition, node.key.clone());
        ensure_finite(&address.to_string(), node.weight, node.data.as_ref())?;

        let Some(existing) = self.read_record::<Node>(&address, "read node").await? else {
            self.put_record(&address, &node, "create node").await?;
            debug!(node = %address, weight, "node created");
            return Ok(node);
        };

        if is_blank(node.data.as_ref()) && node.weight == 0.0 {
            trace!(node = %address, "existence probe, node left untouched");
            return Ok(existing);
        }
        if existing.weight == node.weight
            && self.comparator().same(existing.data.as_ref(), node.data.as_ref())
        {
            trace!(node = %address, "node unchanged");
            return Ok(existing);
        }

        self.replace_record(&address, &node, "update node").await?;
        debug!(node = %address, weight, "node updated");
        Ok(node)
    }

    /// Read a node by kind and caller key.
    pub async fn get_node(&self, kind: &str, key: &str) -> Result<Node> {
        let address = RecordAddress::new(self.node_partition(kind)?, sanitize(key));
        self.read_record(&address, "read node")
            .await?
            .ok_or_else(|| Error::NotFound(format!("node {address}")))
    }

    /// Payload of the node at a `kind/key` reference.
    pub async fn node_data(&self, node_id: &str) -> Result<Option<Value>> {
        let node_ref = NodeRef::parse(node_id)?;
        let node = self.get_node(node_ref.kind(), node_ref.key()).await?;
        Ok(node.data)
    }

    /// True if a node with this kind and caller key is stored.
    pub async fn node_exists(&self, kind: &str, key: &str) -> Result<bool> {
        let address = RecordAddress::new(self.node_partition(kind)?, sanitize(key));
        self.store()
            .exists(&address.partition, &address.key)
            .await
            .map_err(Error::store("check node", &address))
    }

    fn node_partition(&self, kind: &str) -> Result<Partition> {
        if self.config().has_kind(kind) {
            Ok(Partition::Nodes(kind.to_string()))
        } else {
            Err(Error::UnknownPartition(format!("no node partition for kind {kind}")))
        }
    }
}
