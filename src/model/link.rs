//! Link (directed edge) of a semantic spacetime.

use serde::{Deserialize, Serialize};

use super::key::{sanitize, NodeRef};
use super::Value;

/// A directed link between two nodes.
///
/// The partition a link lives in is not stored here; it follows from the
/// semantic type of the association named by `relation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// `+` prefix for a positive association, `-` for its negation.
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_from")]
    pub from: NodeRef,
    #[serde(rename = "_to")]
    pub to: NodeRef,
    /// Association key.
    #[serde(rename = "semantics")]
    pub relation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Importance rank.
    pub weight: f64,
    #[serde(default)]
    pub negated: bool,
}

impl Link {
    /// Build a link with its derived key. `relation` must already be the
    /// sanitized association key.
    pub fn new(
        from: NodeRef,
        relation: impl Into<String>,
        to: NodeRef,
        data: Option<Value>,
        weight: f64,
        negated: bool,
    ) -> Self {
        let relation = relation.into();
        Self {
            key: link_key(&from, &relation, &to, negated),
            from,
            to,
            relation,
            data,
            weight,
            negated,
        }
    }
}

/// Storage key of a link: a pure function of polarity, endpoints and relation.
///
/// The sign is followed by five sanitized parts (from kind, from key,
/// relation, to kind, to key), each written as `{len}:{part}`. The length
/// prefixes make the key decodable, so distinct links never share a key.
///
/// ```
/// use sst::{link_key, NodeRef};
/// let key = link_key(&NodeRef::new("Person", "alice"), "related", &NodeRef::new("Country", "france"), false);
/// assert_eq!(key, "+6:Person5:alice7:related7:Country6:france");
/// ```
pub fn link_key(from: &NodeRef, relation: &str, to: &NodeRef, negated: bool) -> String {
    let mut key = String::from(if negated { '-' } else { '+' });
    for part in [from.kind(), from.key(), relation, to.kind(), to.key()] {
        let part = sanitize(part);
        key.push_str(&format!("{}:{part}", part.len()));
    }
    key
}
