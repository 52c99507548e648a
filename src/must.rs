//! Fail-fast wrappers.
//!
//! Each method forwards to the `Result`-returning operation of the same name
//! on [`Spacetime`] and panics on error. Meant for bootstrap code and demos
//! where there is nothing useful to do with a failure.

use crate::model::{Association, Link, Node, Value};
use crate::storage::{RecordAddress, RecordStore};
use crate::{EventSpec, Result, Spacetime};

fn or_die<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("sst: {err}"),
    }
}

/// Panicking view of a [`Spacetime`], obtained with [`Spacetime::must`].
pub struct Must<'s, S: RecordStore> {
    st: &'s Spacetime<S>,
}

impl<'s, S: RecordStore> Must<'s, S> {
    pub(crate) fn new(st: &'s Spacetime<S>) -> Self {
        Self { st }
    }

    pub fn create_association(&self, association: Association) {
        or_die(self.st.create_association(association))
    }

    pub async fn create_node(&self, kind: &str, key: &str, data: Option<Value>, weight: f64) -> Node {
        or_die(self.st.create_node(kind, key, data, weight).await)
    }

    pub async fn create_link(&self, from: &Node, relation: &str, to: &Node, data: Option<Value>, weight: f64) -> Link {
        or_die(self.st.create_link(from, relation, to, data, weight).await)
    }

    pub async fn create_link_by_id(&self, from_id: &str, relation: &str, to_id: &str, data: Option<Value>, weight: f64) -> Link {
        or_die(self.st.create_link_by_id(from_id, relation, to_id, data, weight).await)
    }

    pub async fn block_link(&self, from: &Node, relation: &str, to: &Node, data: Option<Value>, weight: f64) -> Link {
        or_die(self.st.block_link(from, relation, to, data, weight).await)
    }

    pub async fn block_link_by_id(&self, from_id: &str, relation: &str, to_id: &str, data: Option<Value>, weight: f64) -> Link {
        or_die(self.st.block_link_by_id(from_id, relation, to_id, data, weight).await)
    }

    pub async fn increment_link(&self, from: &Node, relation: &str, to: &Node, data: Option<Value>) -> Link {
        or_die(self.st.increment_link(from, relation, to, data).await)
    }

    pub async fn delete_link(&self, from: &Node, relation: &str, to: &Node, negate: bool) {
        or_die(self.st.delete_link(from, relation, to, negate).await)
    }

    pub fn link_id(&self, link: &Link) -> RecordAddress {
        or_die(self.st.link_id(link))
    }

    pub async fn next_event(&self, kind: &str, key: &str, data: Option<Value>) -> Node {
        or_die(self.st.next_event(kind, key, data).await)
    }

    pub async fn next_events(&self, batch: &[EventSpec]) -> Vec<Node> {
        or_die(self.st.next_events(batch).await)
    }
}
