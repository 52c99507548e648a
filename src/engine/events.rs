//! Event chain: thread `then` links between successive node batches.
//!
//! The chain state is an [`EventCursor`] value. [`Spacetime::advance`] takes
//! the previous cursor and returns the next one, so independent chains can
//! run side by side. [`Spacetime::next_event`] and
//! [`Spacetime::next_events`] keep one cursor inside the session for callers
//! that record a single timeline.

use smallvec::SmallVec;
use tracing::debug;

use crate::model::{Node, Value};
use crate::storage::RecordStore;
use crate::{Result, Spacetime};

use super::LinkOp;

/// Relation linking an event to the events that follow it.
pub const THEN: &str = "then";

/// Weight given to event nodes and their `then` links.
const EVENT_WEIGHT: f64 = 1.0;

/// One node to record as part of an event batch.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSpec {
    pub kind: String,
    pub key: String,
    pub data: Option<Value>,
}

impl EventSpec {
    pub fn new(kind: impl Into<String>, key: impl Into<String>, data: Option<Value>) -> Self {
        Self { kind: kind.into(), key: key.into(), data }
    }
}

/// Position in an event chain.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EventCursor {
    /// Nothing recorded yet. Takes part in no link.
    #[default]
    Start,
    /// The most recent batch.
    After(SmallVec<[Node; 4]>),
}

impl EventCursor {
    pub fn is_start(&self) -> bool {
        matches!(self, EventCursor::Start)
    }

    /// Nodes of the most recent batch; empty at the start.
    pub fn nodes(&self) -> &[Node] {
        match self {
            EventCursor::Start => &[],
            EventCursor::After(nodes) => nodes.as_slice(),
        }
    }

    /// Last node of the most recent batch.
    pub fn last(&self) -> Option<&Node> {
        self.nodes().last()
    }
}

impl<S: RecordStore> Spacetime<S> {
    /// Record a batch of parallel events after `prev`.
    ///
    /// Every node of `prev` gets a `then` link to every node of the batch.
    /// An empty batch returns `prev` unchanged. On failure the nodes and
    /// links already written stay written.
    pub async fn advance(&self, prev: &EventCursor, batch: &[EventSpec]) -> Result<EventCursor> {
        if batch.is_empty() {
            return Ok(prev.clone());
        }
        if !prev.is_start() {
            // Fail before writing anything if the session lacks the relation.
            self.association(THEN)?;
        }

        let mut created: SmallVec<[Node; 4]> = SmallVec::with_capacity(batch.len());
        for spec in batch {
            let node = self.create_node(&spec.kind, &spec.key, spec.data.clone(), EVENT_WEIGHT).await?;
            created.push(node);
        }

        for before in prev.nodes() {
            let from = before.node_ref();
            for after in &created {
                self.apply_link_op(&from, THEN, &after.node_ref(), None, EVENT_WEIGHT, false, LinkOp::Upsert)
                    .await?;
            }
        }
        debug!(
            predecessors = prev.nodes().len(),
            events = created.len(),
            "event batch recorded"
        );
        Ok(EventCursor::After(created))
    }

    /// Record one event after the session cursor and move the cursor to it.
    ///
    /// The cursor is read and swapped under a lock, but the writes in between
    /// are not: concurrent calls on one session must be serialized by the
    /// caller.
    pub async fn next_event(&self, kind: &str, key: &str, data: Option<Value>) -> Result<Node> {
        let mut nodes = self.next_events(&[EventSpec::new(kind, key, data)]).await?;
        Ok(nodes.remove(0))
    }

    /// Record a batch of parallel events after the session cursor.
    pub async fn next_events(&self, batch: &[EventSpec]) -> Result<Vec<Node>> {
        let prev = self.cursor.lock().clone();
        let next = self.advance(&prev, batch).await?;
        let nodes = next.nodes().to_vec();
        *self.cursor.lock() = next;
        Ok(nodes)
    }

    /// Most recent event recorded through the session cursor.
    pub fn previous_event(&self) -> Option<Node> {
        self.cursor.lock().last().cloned()
    }

    /// Most recent batch recorded through the session cursor.
    pub fn previous_events(&self) -> Vec<Node> {
        self.cursor.lock().nodes().to_vec()
    }

    /// Snapshot of the session cursor.
    pub fn event_cursor(&self) -> EventCursor {
        self.cursor.lock().clone()
    }

    /// Start a new timeline: the next event gets no predecessor.
    pub fn reset_events(&self) {
        *self.cursor.lock() = EventCursor::Start;
    }
}
