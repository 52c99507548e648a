//! Storage keys and node references.
//!
//! Every piece of caller-supplied key material passes through [`sanitize`]
//! exactly once before it is stored or compared. Two labels that sanitize to
//! the same key name the same entity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Punctuation allowed in a storage key besides ASCII letters and digits.
const KEY_PUNCTUATION: &[char] = &[
    '_', ':', '.', '@', '(', ')', '+', ',', '=', ';', '$', '!', '*', '\'', '%', '-',
];

/// Returns true if `c` may appear verbatim in a storage key.
pub fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || KEY_PUNCTUATION.contains(&c)
}

/// Map an arbitrary display string to a storage-legal key.
///
/// Every char outside the allowed set becomes `_`, one `_` per char.
/// Total, deterministic and idempotent.
///
/// ```
/// assert_eq!(sst::sanitize("Number 12345"), "Number_12345");
/// ```
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if is_key_char(c) { c } else { '_' })
        .collect()
}

/// Returns true if `key` is already in sanitized form.
pub fn is_sanitized(key: &str) -> bool {
    key.chars().all(is_key_char)
}

// ============================================================================
// NodeRef
// ============================================================================

/// Fully-qualified node identity: `kind/key`.
///
/// Links address their endpoints through this reference. The key half is
/// always sanitized; the kind is a declared node partition name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeRef {
    kind: String,
    key: String,
}

impl NodeRef {
    /// Build a reference, sanitizing `raw_key`.
    pub fn new(kind: impl Into<String>, raw_key: &str) -> Self {
        Self { kind: kind.into(), key: sanitize(raw_key) }
    }

    /// Build a reference from a key that is already sanitized.
    pub(crate) fn from_sanitized(kind: impl Into<String>, key: impl Into<String>) -> Self {
        Self { kind: kind.into(), key: key.into() }
    }

    /// Parse a `kind/key` string. The key half is sanitized on the way in.
    ///
    /// Empty input, a missing `/`, or an empty half is a [`Error::NilReference`].
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::NilReference("empty node reference".into()));
        }
        let (kind, key) = s
            .split_once('/')
            .ok_or_else(|| Error::NilReference(format!("node reference without kind: {s}")))?;
        if kind.is_empty() || key.is_empty() {
            return Err(Error::NilReference(format!("incomplete node reference: {s}")));
        }
        Ok(Self::new(kind, key))
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.key)
    }
}

impl FromStr for NodeRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NodeRef {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<NodeRef> for String {
    fn from(r: NodeRef) -> Self {
        r.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sanitize_replaces_spaces() {
        assert_eq!(sanitize("Number 12345"), "Number_12345");
    }

    #[test]
    fn test_sanitize_keeps_allowed_punctuation() {
        let raw = "a_b:c.d@e(f)g+h,i=j;k$l!m*n'o%p-q";
        assert_eq!(sanitize(raw), raw);
    }

    #[test]
    fn test_sanitize_one_underscore_per_char() {
        assert_eq!(sanitize("a/b c"), "a_b_c");
        assert_eq!(sanitize("café"), "caf_");
        assert_eq!(sanitize("x#?y"), "x__y");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_node_ref_parse_sanitizes_key() {
        let r = NodeRef::parse("Person/Ada Lovelace").unwrap();
        assert_eq!(r.kind(), "Person");
        assert_eq!(r.key(), "Ada_Lovelace");
        assert_eq!(r.to_string(), "Person/Ada_Lovelace");
    }

    #[test]
    fn test_node_ref_parse_rejects_incomplete() {
        for bad in ["", "Person", "/alice", "Person/"] {
            assert!(matches!(NodeRef::parse(bad), Err(Error::NilReference(_))), "{bad:?}");
        }
    }

    #[test]
    fn test_node_ref_key_may_contain_slash_before_sanitizing() {
        let r = NodeRef::parse("Hub/Paris/France").unwrap();
        assert_eq!(r.kind(), "Hub");
        assert_eq!(r.key(), "Paris_France");
    }

    proptest! {
        #[test]
        fn prop_sanitize_is_idempotent(s in ".*") {
            let once = sanitize(&s);
            prop_assert_eq!(sanitize(&once), once.clone());
            prop_assert!(is_sanitized(&once));
        }

        #[test]
        fn prop_sanitize_preserves_char_count(s in ".*") {
            prop_assert_eq!(sanitize(&s).chars().count(), s.chars().count());
        }
    }
}
