use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub use crate::types::{FieldName, RecordIndex};

/// Grouping key derived from a non-null source value.
///
/// Strings and other scalars live in separate variants so the string `"1"`
/// and the number `1` are different sources.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKey {
    /// A string source, kept verbatim (no case or whitespace folding).
    Text(String),
    /// Any other non-null value, rendered as compact JSON.
    Scalar(String),
}

impl SourceKey {
    /// The key text without its variant.
    pub fn as_str(&self) -> &str {
        match self {
            SourceKey::Text(text) | SourceKey::Scalar(text) => text,
        }
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for SourceKey {
    fn from(value: &str) -> Self {
        SourceKey::Text(value.to_string())
    }
}

/// One flat record: field name to JSON value, in file order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<FieldName, Value>,
}

impl Record {
    /// Wrap an already parsed field map.
    pub fn new(fields: IndexMap<FieldName, Value>) -> Self {
        Self { fields }
    }

    /// Builder-style insert used by tests and ad-hoc callers.
    pub fn with(mut self, field: impl Into<FieldName>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Field lookup.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &FieldName> {
        self.fields.keys()
    }

    /// Grouping key for `field`, or `None` when the field is absent or null.
    pub fn source_key(&self, field: &str) -> Option<SourceKey> {
        match self.fields.get(field)? {
            Value::Null => None,
            Value::String(text) => Some(SourceKey::Text(text.clone())),
            other => Some(SourceKey::Scalar(other.to_string())),
        }
    }
}

/// Ordered collection of records; a record's identity is its position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Wrap records in load order.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in position order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Take the records back out.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// True if at least one record has `field` present (null included).
    pub fn has_field(&self, field: &str) -> bool {
        self.records.iter().any(|record| record.get(field).is_some())
    }

    /// Union of field names across all records, in first-seen order.
    pub fn columns(&self) -> Vec<FieldName> {
        let mut seen: IndexSet<&str> = IndexSet::new();
        for record in &self.records {
            seen.extend(record.field_names().map(String::as_str));
        }
        seen.into_iter().map(str::to_string).collect()
    }

    /// Clone out the records at `indices`, in the given order.
    pub fn select(&self, indices: &[RecordIndex]) -> Dataset {
        Dataset::new(
            indices
                .iter()
                .filter_map(|index| self.records.get(*index).cloned())
                .collect(),
        )
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
