//! Associations: named relations with a semantic class and four readings.

use serde::{Deserialize, Serialize};

use super::key::sanitize;
use super::semantic::SemanticType;

/// Invariant relationship data, looked up by name when a link is written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Association {
    /// Canonical relation name, sanitized on registration.
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "stype")]
    pub semantic_type: SemanticType,
    #[serde(rename = "fwd")]
    pub forward: String,
    #[serde(rename = "bwd")]
    pub backward: String,
    #[serde(rename = "nfwd")]
    pub not_forward: String,
    #[serde(rename = "nbwd")]
    pub not_backward: String,
}

impl Association {
    pub fn new(
        key: impl Into<String>,
        semantic_type: SemanticType,
        forward: impl Into<String>,
        backward: impl Into<String>,
        not_forward: impl Into<String>,
        not_backward: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            semantic_type,
            forward: forward.into(),
            backward: backward.into(),
            not_forward: not_forward.into(),
            not_backward: not_backward.into(),
        }
    }

    /// Copy with the key in sanitized form.
    pub fn sanitized(mut self) -> Self {
        self.key = sanitize(&self.key);
        self
    }

    /// Reading of the relation from one end, with or without negation.
    pub fn reading(&self, negated: bool, backward: bool) -> &str {
        match (negated, backward) {
            (false, false) => &self.forward,
            (false, true) => &self.backward,
            (true, false) => &self.not_forward,
            (true, true) => &self.not_backward,
        }
    }
}

// ============================================================================
// Default table
// ============================================================================

type Row = (&'static str, SemanticType, &'static str, &'static str, &'static str, &'static str);

const C: SemanticType = SemanticType::CONTAINS;
const NC: SemanticType = SemanticType::CONSTITUTES;
const E: SemanticType = SemanticType::EXPRESSES;
const F: SemanticType = SemanticType::FOLLOWS;
const NF: SemanticType = SemanticType::PRECEDES;
const N: SemanticType = SemanticType::NEAR;

const DEFAULT_ROWS: &[Row] = &[
    ("contains", C, "contains", "belongs to or is part of", "does not contain", "is not part of"),
    ("generalizes", C, "generalizes", "is a special case of", "is not a generalization of", "is not a special case of"),
    ("part_of", NC, "is part of", "incorporates", "is not part of", "doesn't incorporate"),
    ("has_role", E, "has the role of", "is a role fulfilled by", "has no role", "is not a role fulfilled by"),
    ("originates_from", F, "originates from", "is the source/origin of", "does not originate from", "is not the source/origin of"),
    ("expresses", E, "expresses an attribute", "is an attribute of", "has no attribute", "is not an attribute of"),
    ("promises", E, "promises/intends", "is intended/promised by", "rejects/promises to not", "is rejected by"),
    ("has_name", E, "has proper name", "is the proper name of", "is not named", "isn't the proper name of"),
    ("follows_from", F, "follows on from", "is followed by", "does not follow", "does not precede"),
    ("uses", F, "uses", "is used by", "does not use", "is not used by"),
    ("caused_by", F, "caused by", "may cause", "was not caused by", "probably didn't cause"),
    ("derives_from", F, "derives from", "leads to", "does not derive from", "does not lead to"),
    ("depends", F, "may depends on", "may determine", "doesn't depend on", "doesn't determine"),
    ("next", NF, "comes before", "comes after", "is not before", "is not after"),
    ("then", NF, "then", "previously", "but not", "didn't follow"),
    ("leads_to", NF, "leads to", "doesn't imply", "doesn't reach", "doesn't precede"),
    ("precedes", NF, "precedes", "follows", "doesn't precede", "doesn't follow"),
    ("related", N, "may be related to", "may be related to", "likely unrelated to", "likely unrelated to"),
    ("alias", N, "also known as", "also known as", "not known as", "not known as"),
    ("is_like", N, "is similar to", "is similar to", "is unlike", "is unlike"),
    ("connected", N, "is connected to", "is connected to", "is not connected to", "is not connected to"),
    ("coactive", N, "occurred together with", "occurred together with", "never appears with", "never appears with"),
];

/// A fresh copy of the built-in association table.
pub fn default_associations() -> Vec<Association> {
    DEFAULT_ROWS
        .iter()
        .map(|&(key, st, fwd, bwd, nfwd, nbwd)| Association::new(key, st, fwd, bwd, nfwd, nbwd))
        .collect()
}
