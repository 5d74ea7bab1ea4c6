//! Row type: an insertion-ordered map of logical field names to values.

use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered map of logical field name → [`Value`].
///
/// Rows serve double duty: they are the payloads fed into
/// `create`/`read`/`update`/`delete`, and the result shape
/// produced by the query finishers (keyed by logical names, not physical
/// columns). Iteration order is insertion order, which is load-bearing — an
/// INSERT's column list follows the payload's order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: IndexMap<String, Value>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any existing value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Get a field value by logical name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Shorthand for `get("id")`.
    pub fn id(&self) -> Option<&Value> {
        self.fields.get("id")
    }

    /// Whether the row has a field under this name.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Build a [`Row`] from `name => value` pairs.
///
/// # Example
/// ```ignore
/// let ana = row! { "id" => 1, "name" => "Ana" };
/// ```
#[macro_export]
macro_rules! row {
    () => { $crate::Row::new() };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut row = $crate::Row::new();
        $( row.insert($name, $crate::Value::from($value)); )+
        row
    }};
}
