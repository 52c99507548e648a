//! DataMap — keyed payloads attached to nodes and links.

use std::collections::HashMap;
use super::Value;

/// A map of field names to values.
pub type DataMap = HashMap<String, Value>;

/// Convert a list of (field, value) pairs into a `Map` payload.
impl<K, V> From<Vec<(K, V)>> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        Value::Map(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<DataMap> for Value {
    fn from(map: DataMap) -> Self {
        Value::Map(map)
    }
}
