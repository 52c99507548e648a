//! Node (vertex) of a semantic spacetime.

use serde::{Deserialize, Serialize};

use super::key::NodeRef;
use super::Value;

/// A node stored in the partition named by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Sanitized short name, unique within the kind.
    #[serde(rename = "_key")]
    pub key: String,
    /// Node partition the record lives in.
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Importance rank.
    pub weight: f64,
}

impl Node {
    /// Fully-qualified reference used as a link endpoint.
    pub fn node_ref(&self) -> NodeRef {
        NodeRef::from_sanitized(self.kind.clone(), self.key.clone())
    }

    /// `kind/key` string form of [`Node::node_ref`].
    pub fn id(&self) -> String {
        format!("{}/{}", self.kind, self.key)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.as_ref().and_then(|d| d.get(field))
    }
}
