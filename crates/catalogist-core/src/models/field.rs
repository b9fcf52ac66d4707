use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{CoreError, Result};
use crate::models::dialect::Dialect;

/// A single extracted value: plain text, or a list for multi-valued fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::List(items) => items.iter().all(String::is_empty),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::List(_) => None,
        }
    }

    /// Flatten to a single cell, joining list items with `separator`.
    pub fn render(&self, separator: &str) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::List(items) => items.join(separator),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Extracted fields for one document.
///
/// Every key of the dialect's vocabulary is always present; fields that were
/// never set hold an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    dialect: Dialect,
    values: Vec<FieldValue>,
}

impl FieldMap {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            values: vec![FieldValue::default(); dialect.fields().len()],
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<()> {
        let index = self.index_of(field)?;
        self.values[index] = value.into();
        Ok(())
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.index_of(field).ok().map(|index| &self.values[index])
    }

    /// Text value of `field`, or `""` for lists and unknown keys.
    pub fn text(&self, field: &str) -> &str {
        self.get(field).and_then(FieldValue::as_text).unwrap_or("")
    }

    pub fn fields(&self) -> &'static [&'static str] {
        self.dialect.fields()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields().iter().copied().zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn into_values(self) -> Vec<FieldValue> {
        self.values
    }

    fn index_of(&self, field: &str) -> Result<usize> {
        self.fields()
            .iter()
            .position(|name| *name == field)
            .ok_or_else(|| CoreError::UnknownField {
                dialect: self.dialect.to_string(),
                field: field.to_string(),
            })
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
