//! Payload value carried by nodes and links.
//!
//! The engine never looks inside a payload. It only asks whether a payload
//! is empty and, through a [`PayloadComparator`], whether two payloads are
//! the same.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Structured payload.
///
/// Covers the shapes callers attach to graph records:
/// - Scalars: Bool, Int, Float, String, Bytes
/// - Containers: List, Map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
}

// ============================================================================
// Inspection
// ============================================================================

impl Value {
    /// Null, or a container or string with nothing in it.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            Value::List(l) => l.is_empty(),
            Value::Map(m) => m.is_empty(),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => false,
        }
    }

    /// Look up a field of a `Map` payload.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(m) => m.get(key),
            _ => None,
        }
    }

    /// First NaN or infinite float anywhere in the payload. Such a payload
    /// cannot be stored as a JSON document.
    pub fn non_finite(&self) -> Option<f64> {
        match self {
            Value::Float(f) if !f.is_finite() => Some(*f),
            Value::List(l) => l.iter().find_map(Value::non_finite),
            Value::Map(m) => m.values().find_map(Value::non_finite),
            _ => None,
        }
    }
}

/// True when a payload is absent or empty.
pub fn is_blank(data: Option<&Value>) -> bool {
    data.is_none_or(Value::is_empty)
}

// ============================================================================
// Comparison
// ============================================================================

/// Decides whether an incoming payload differs from a stored one.
///
/// Used by node and link upserts to detect "unchanged" writes regardless of
/// payload shape.
pub trait PayloadComparator: Send + Sync {
    fn same(&self, stored: Option<&Value>, incoming: Option<&Value>) -> bool;
}

/// Structural equality where an empty payload equals an absent one.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralEq;

impl PayloadComparator for StructuralEq {
    fn same(&self, stored: Option<&Value>, incoming: Option<&Value>) -> bool {
        match (stored, incoming) {
            (Some(a), Some(b)) => a == b,
            (a, b) => is_blank(a) && is_blank(b),
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<i32> for Value { fn from(v: i32) -> Self { Value::Int(v as i64) } }
impl From<i64> for Value { fn from(v: i64) -> Self { Value::Int(v) } }
impl From<f64> for Value { fn from(v: f64) -> Self { Value::Float(v) } }
impl From<String> for Value { fn from(v: String) -> Self { Value::String(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::String(v.to_owned()) } }
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self { Value::List(v.into_iter().map(Into::into).collect()) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Value::Null) }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(a) => Value::List(a.into_iter().map(Into::into).collect()),
            serde_json::Value::Object(o) => {
                Value::Map(o.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            Value::Bytes(b) => write!(f, "<bytes[{}]>", b.len()),
            Value::List(l) => {
                write!(f, "[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Map(m) => {
                let mut keys: Vec<&String> = m.keys().collect();
                keys.sort();
                write!(f, "{{")?;
                for (i, k) in keys.into_iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{k}: {}", m[k])?;
                }
                write!(f, "}}")
            }
        }
    }
}
