//! Semantic types and the four link classes.
//!
//! A [`SemanticType`] is a signed small integer. The magnitude picks one of
//! four [`LinkClass`] partitions; the sign only picks the label. `Contains`
//! and `-Contains` land in the same partition and read as "Contains" and
//! "Constitutes".

use std::fmt;
use std::ops::Neg;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ============================================================================
// SemanticType
// ============================================================================

/// Signed semantic relationship class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SemanticType(pub i8);

impl SemanticType {
    pub const NEAR: Self = Self(0);
    pub const FOLLOWS: Self = Self(1);
    pub const CONTAINS: Self = Self(2);
    pub const EXPRESSES: Self = Self(3);

    /// Inverse readings of the polarity-bearing classes.
    pub const PRECEDES: Self = Self(-1);
    pub const CONSTITUTES: Self = Self(-2);
    pub const DESCRIBES: Self = Self(-3);

    pub fn magnitude(self) -> u8 {
        self.0.unsigned_abs()
    }

    /// True for the inverse-named half of a class.
    pub fn is_inverse(self) -> bool {
        self.0 < 0
    }

    /// Storage partition for this type, chosen by magnitude.
    ///
    /// A magnitude outside the four classes is a programming error and is
    /// reported as [`Error::UnknownPartition`].
    pub fn partition(self) -> Result<LinkClass> {
        LinkClass::from_magnitude(self.magnitude()).ok_or_else(|| {
            Error::UnknownPartition(format!("no link partition for semantic type {}", self.0))
        })
    }

    /// Human-readable class name.
    ///
    /// `Near` has no inverse: `-0` is `0`, so it always reads "Near".
    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "Near",
            1 => "Follows",
            -1 => "Precedes",
            2 => "Contains",
            -2 => "Constitutes",
            3 => "Expresses",
            -3 => "Describes",
            _ => "unknown",
        }
    }
}

impl Neg for SemanticType {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<LinkClass> for SemanticType {
    fn from(class: LinkClass) -> Self {
        Self(class as i8)
    }
}

// ============================================================================
// LinkClass
// ============================================================================

/// One of the four fixed link partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LinkClass {
    Near = 0,
    Follows = 1,
    Contains = 2,
    Expresses = 3,
}

impl LinkClass {
    pub const ALL: [LinkClass; 4] = [
        LinkClass::Near,
        LinkClass::Follows,
        LinkClass::Contains,
        LinkClass::Expresses,
    ];

    pub fn from_magnitude(magnitude: u8) -> Option<Self> {
        match magnitude {
            0 => Some(LinkClass::Near),
            1 => Some(LinkClass::Follows),
            2 => Some(LinkClass::Contains),
            3 => Some(LinkClass::Expresses),
            _ => None,
        }
    }

    /// Partition name as provisioned in the record store.
    pub fn name(self) -> &'static str {
        match self {
            LinkClass::Near => "Near",
            LinkClass::Follows => "Follows",
            LinkClass::Contains => "Contains",
            LinkClass::Expresses => "Expresses",
        }
    }
}

impl fmt::Display for LinkClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
