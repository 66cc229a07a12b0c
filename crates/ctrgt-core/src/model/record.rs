//! Dynamic records: an ordered field-name to value mapping

use crate::errors::RecordError;
use crate::model::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name of the primary identifier in every collection
pub const ID_FIELD: &str = "id";

/// One row of a collection, keyed by column name
///
/// Serializes as a flat JSON object. Field order is the map's key order,
/// which keeps dumps and test output stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON object
    pub fn from_json(value: serde_json::Value) -> Result<Self, RecordError> {
        match value {
            serde_json::Value::Object(map) => {
                let mut record = Record::new();
                for (field, v) in map {
                    let converted = FieldValue::from_json(&field, v)?;
                    record.fields.insert(field, converted);
                }
                Ok(record)
            }
            _ => Err(RecordError::UnsupportedValue {
                field: "<record>".to_string(),
            }),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::from(v.clone())))
                .collect(),
        )
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Builder-style insert, handy for assembling payloads
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The record's identifier rendered as a string, if present
    pub fn id(&self) -> Option<String> {
        self.get(ID_FIELD).and_then(FieldValue::to_key_string)
    }

    /// Overlay `other` on top of this record
    pub fn merge(&mut self, other: Record) {
        self.fields.extend(other.fields);
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
