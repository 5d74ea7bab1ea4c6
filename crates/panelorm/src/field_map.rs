//! Field maps: ordered logical-name → physical-column configuration.

use crate::error::{OrmError, OrmResult};
use crate::ident::check_ident;
use indexmap::IndexMap;

/// Physical column metadata for one logical field.
///
/// Currently just the column name; the struct keeps room for the extra
/// per-field metadata the configuration format reserves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub column: String,
}

impl ColumnSpec {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

/// Ordered mapping from logical field names to physical columns.
///
/// Validated eagerly at construction: the map must be non-empty, must contain
/// an `"id"` entry (the primary key), and every name on both sides must be a
/// bare SQL identifier. A builder never runs against an unvalidated map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    fields: IndexMap<String, ColumnSpec>,
}

impl FieldMap {
    /// Build a field map from `(logical, column)` pairs.
    ///
    /// # Example
    /// ```ignore
    /// let map = FieldMap::new([("id", "id"), ("name", "full_name")])?;
    /// ```
    pub fn new<I, K, V>(entries: I) -> OrmResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields = IndexMap::new();
        for (logical, column) in entries {
            let logical = logical.into();
            let spec = ColumnSpec::new(column);
            check_ident(&logical)?;
            check_ident(&spec.column)?;
            if fields.insert(logical.clone(), spec).is_some() {
                return Err(OrmError::config(format!(
                    "Duplicate field '{logical}' in field map"
                )));
            }
        }
        if fields.is_empty() {
            return Err(OrmError::config("Field map cannot be empty"));
        }
        if !fields.contains_key("id") {
            return Err(OrmError::config("Field map must contain an 'id' entry"));
        }
        Ok(Self { fields })
    }

    /// Physical column for a logical field name.
    pub fn column(&self, logical: &str) -> Option<&str> {
        self.fields.get(logical).map(|spec| spec.column.as_str())
    }

    /// The primary key column (the `"id"` entry, guaranteed present).
    pub fn id_column(&self) -> &str {
        self.fields
            .get("id")
            .map(|spec| spec.column.as_str())
            .unwrap_or("id")
    }

    /// Iterate `(logical, column)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(logical, spec)| (logical.as_str(), spec.column.as_str()))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false for a validated map; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
