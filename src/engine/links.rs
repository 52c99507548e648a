//! Link store: idempotent create / block / increment / delete of typed edges.
//!
//! A link lives in the partition chosen by the magnitude of its
//! association's semantic type, under a key derived from
//! `(polarity, from, relation, to)`. Issuing the same mutation twice always
//! lands on the same record.

use tracing::{debug, trace};

use crate::model::{link_key, Link, Node, NodeRef, PayloadComparator, SemanticType, Value};
use crate::storage::{RecordAddress, RecordStore};
use crate::{Error, Result, Spacetime};

use super::ensure_finite;

// ============================================================================
// LinkOp
// ============================================================================

/// What to do when a link already exists at the derived key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOp {
    /// Replace weight and data, unless the candidate is unchanged or carries
    /// a negative weight.
    Upsert,
    /// Add 1.0 to the stored weight and take the candidate's data. Always
    /// targets the positive polarity.
    Increment,
}

impl LinkOp {
    /// Decide the stored result. Returns the link to keep and whether the
    /// write can be skipped.
    pub fn resolve(
        self,
        existing: &Link,
        mut candidate: Link,
        comparator: &dyn PayloadComparator,
    ) -> (Link, bool) {
        match self {
            LinkOp::Upsert => {
                let unchanged = existing.weight == candidate.weight
                    && comparator.same(existing.data.as_ref(), candidate.data.as_ref());
                if candidate.weight < 0.0 || unchanged {
                    (existing.clone(), true)
                } else {
                    (candidate, false)
                }
            }
            LinkOp::Increment => {
                candidate.weight = existing.weight + 1.0;
                (candidate, false)
            }
        }
    }
}

fn endpoint(node: &Node) -> Result<NodeRef> {
    if node.kind.is_empty() || node.key.is_empty() {
        return Err(Error::NilReference(format!("link endpoint {:?} has no identity", node.id())));
    }
    Ok(node.node_ref())
}

// ============================================================================
// Link operations
// ============================================================================

impl<S: RecordStore> Spacetime<S> {
    /// Core primitive behind every link mutation.
    ///
    /// Creates the link if absent, otherwise applies `op` to the stored
    /// record. `Increment` ignores `negate`, and for it `weight` is only the
    /// initial weight of a new link: a stored link always gains 1.0. A new
    /// link with a negative weight is rejected with [`Error::NegativeWeight`],
    /// and a NaN or infinite weight or payload float with
    /// [`Error::InvalidWeight`] or [`Error::InvalidPayload`].
    ///
    /// Not atomic: concurrent callers on the same key race read/write and
    /// the last write wins.
    #[allow(clippy::too_many_arguments)]
    pub async fn apply_link_op(
        &self,
        from: &NodeRef,
        relation: &str,
        to: &NodeRef,
        data: Option<Value>,
        weight: f64,
        negate: bool,
        op: LinkOp,
    ) -> Result<Link> {
        let association = self.association(relation)?;
        let class = association.semantic_type.partition()?;
        let negate = negate && op != LinkOp::Increment;
        let candidate = Link::new(from.clone(), association.key, to.clone(), data, weight, negate);
        let address = RecordAddress::new(class.into(), candidate.key.clone());
        ensure_finite(&address.to_string(), weight, candidate.data.as_ref())?;

        let Some(existing) = self.read_record::<Link>(&address, "read link").await? else {
            if weight < 0.0 {
                return Err(Error::NegativeWeight { key: candidate.key, weight });
            }
            self.put_record(&address, &candidate, "create link").await?;
            debug!(link = %address, weight, "link created");
            return Ok(candidate);
        };

        let (link, noop) = op.resolve(&existing, candidate, self.comparator());
        if noop {
            trace!(link = %address, ?op, "link left unchanged");
            return Ok(link);
        }
        self.replace_record(&address, &link, "update link").await?;
        debug!(link = %address, ?op, weight = link.weight, "link updated");
        Ok(link)
    }

    /// Create the link, or update the existing one with new weight and data.
    pub async fn create_link(
        &self,
        from: &Node,
        relation: &str,
        to: &Node,
        data: Option<Value>,
        weight: f64,
    ) -> Result<Link> {
        self.apply_link_op(&endpoint(from)?, relation, &endpoint(to)?, data, weight, false, LinkOp::Upsert)
            .await
    }

    /// [`create_link`](Self::create_link) with `kind/key` endpoint references.
    pub async fn create_link_by_id(
        &self,
        from_id: &str,
        relation: &str,
        to_id: &str,
        data: Option<Value>,
        weight: f64,
    ) -> Result<Link> {
        let (from, to) = (NodeRef::parse(from_id)?, NodeRef::parse(to_id)?);
        self.apply_link_op(&from, relation, &to, data, weight, false, LinkOp::Upsert).await
    }

    /// Create or update the negation of a link. A positive link between the
    /// same endpoints is left alone.
    pub async fn block_link(
        &self,
        from: &Node,
        relation: &str,
        to: &Node,
        data: Option<Value>,
        weight: f64,
    ) -> Result<Link> {
        self.apply_link_op(&endpoint(from)?, relation, &endpoint(to)?, data, weight, true, LinkOp::Upsert)
            .await
    }

    /// [`block_link`](Self::block_link) with `kind/key` endpoint references.
    pub async fn block_link_by_id(
        &self,
        from_id: &str,
        relation: &str,
        to_id: &str,
        data: Option<Value>,
        weight: f64,
    ) -> Result<Link> {
        let (from, to) = (NodeRef::parse(from_id)?, NodeRef::parse(to_id)?);
        self.apply_link_op(&from, relation, &to, data, weight, true, LinkOp::Upsert).await
    }

    /// Create the link with weight 1.0, or add 1.0 to the stored weight.
    pub async fn increment_link(
        &self,
        from: &Node,
        relation: &str,
        to: &Node,
        data: Option<Value>,
    ) -> Result<Link> {
        self.apply_link_op(&endpoint(from)?, relation, &endpoint(to)?, data, 1.0, false, LinkOp::Increment)
            .await
    }

    /// [`increment_link`](Self::increment_link) with `kind/key` endpoint references.
    pub async fn increment_link_by_id(
        &self,
        from_id: &str,
        relation: &str,
        to_id: &str,
        data: Option<Value>,
    ) -> Result<Link> {
        let (from, to) = (NodeRef::parse(from_id)?, NodeRef::parse(to_id)?);
        self.apply_link_op(&from, relation, &to, data, 1.0, false, LinkOp::Increment).await
    }

    /// Delete the link if it exists. Deleting a missing link succeeds.
    pub async fn delete_link(&self, from: &Node, relation: &str, to: &Node, negate: bool) -> Result<()> {
        self.remove_link(&endpoint(from)?, relation, &endpoint(to)?, negate).await
    }

    /// [`delete_link`](Self::delete_link) with `kind/key` endpoint references.
    pub async fn delete_link_by_id(
        &self,
        from_id: &str,
        relation: &str,
        to_id: &str,
        negate: bool,
    ) -> Result<()> {
        let (from, to) = (NodeRef::parse(from_id)?, NodeRef::parse(to_id)?);
        self.remove_link(&from, relation, &to, negate).await
    }

    async fn remove_link(&self, from: &NodeRef, relation: &str, to: &NodeRef, negate: bool) -> Result<()> {
        let address = self.link_address(from, relation, to, negate)?;
        let existed = self
            .store()
            .delete(&address.partition, &address.key)
            .await
            .map_err(Error::store("delete link", &address))?;
        if existed {
            debug!(link = %address, "link deleted");
        } else {
            trace!(link = %address, "link already absent");
        }
        Ok(())
    }

    /// Read the link between two references, if stored.
    pub async fn get_link(
        &self,
        from: &NodeRef,
        relation: &str,
        to: &NodeRef,
        negate: bool,
    ) -> Result<Option<Link>> {
        let address = self.link_address(from, relation, to, negate)?;
        self.read_record(&address, "read link").await
    }

    /// Store address of a link, rebuilt from its association.
    pub fn link_id(&self, link: &Link) -> Result<RecordAddress> {
        let association = self.association(&link.relation)?;
        self.link_id_with(link, association.semantic_type)
    }

    /// Store address of a link under an explicit semantic type.
    pub fn link_id_with(&self, link: &Link, semantic_type: SemanticType) -> Result<RecordAddress> {
        if link.key.is_empty() {
            return Err(Error::NilReference("link has no key".into()));
        }
        Ok(RecordAddress::new(semantic_type.partition()?.into(), link.key.clone()))
    }

    /// Natural-language reading of a link, e.g.
    /// `Person/alice may be related to Country/france`.
    pub fn describe_link(&self, link: &Link) -> Result<String> {
        let association = self.association(&link.relation)?;
        Ok(format!("{} {} {}", link.from, association.reading(link.negated, false), link.to))
    }

    fn link_address(
        &self,
        from: &NodeRef,
        relation: &str,
        to: &NodeRef,
        negate: bool,
    ) -> Result<RecordAddress> {
        let association = self.association(relation)?;
        let class = association.semantic_type.partition()?;
        Ok(RecordAddress::new(class.into(), link_key(from, &association.key, to, negate)))
    }
}
