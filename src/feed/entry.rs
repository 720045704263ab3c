use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One value of a [`FeedEntry`] field.
///
/// Feed parsers hand back loosely typed data, so every shape a field can
/// take is spelled out here. Consumers match on the variants they understand
/// and treat everything else as "no usable value".
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
    /// Raw bytes that were never decoded (may not be valid UTF-8).
    #[serde(skip_deserializing)]
    Bytes(Vec<u8>),
    /// An instant already parsed by the feed parser.
    #[serde(skip_deserializing)]
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Renders scalar values as text.
    ///
    /// Undecodable bytes are replaced with U+FFFD, so this never fails for
    /// `Text`, `Bytes` or numbers. Structured values have no text form.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Text(s) => Some(Cow::Borrowed(s)),
            FieldValue::Bytes(b) => Some(String::from_utf8_lossy(b)),
            FieldValue::Integer(n) => Some(Cow::Owned(n.to_string())),
            FieldValue::Float(n) => Some(Cow::Owned(n.to_string())),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Bytes(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(values: Vec<FieldValue>) -> Self {
        FieldValue::List(values)
    }
}

/// Integer lists become time-struct shaped values, e.g. `vec![2009, 3, 14, 15, 9, 26]`.
impl From<Vec<i64>> for FieldValue {
    fn from(values: Vec<i64>) -> Self {
        FieldValue::List(values.into_iter().map(FieldValue::Integer).collect())
    }
}

/// A parsed feed item as a mapping of field name to value.
///
/// No field is required; lookups return `None` for anything absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FeedEntry {
    fields: BTreeMap<String, FieldValue>,
}

impl FeedEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for constructing entries inline.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Text form of a scalar field, see [`FieldValue::as_text`].
    pub fn text(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FeedEntry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entry = FeedEntry::new();
        for (name, value) in iter {
            entry.insert(name, value);
        }
        entry
    }
}

impl From<BTreeMap<String, FieldValue>> for FeedEntry {
    fn from(fields: BTreeMap<String, FieldValue>) -> Self {
        Self { fields }
    }
}
