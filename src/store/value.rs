use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

/// A field value as the document stores understand it.
///
/// Integers and doubles stay distinct because Firestore types them
/// separately. `ServerTimestamp` is a write-time sentinel: stores replace it
/// with their own notion of "now" when the document is persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<Value>),
    Map(Document),
    ServerTimestamp,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Plain JSON view used by the SQL backend and for logging. Timestamps
    /// become RFC 3339 strings; an unresolved server timestamp becomes null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::ServerTimestamp => serde_json::Value::Null,
            Value::Bool(value) => serde_json::Value::Bool(*value),
            Value::Integer(value) => serde_json::Value::from(*value),
            Value::Double(value) => serde_json::Number::from_f64(*value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(value) => serde_json::Value::String(value.clone()),
            Value::Timestamp(value) => {
                serde_json::Value::String(value.to_rfc3339_opts(SecondsFormat::Micros, true))
            }
            Value::Array(values) => {
                serde_json::Value::Array(values.iter().map(Value::to_json).collect())
            }
            Value::Map(document) => document.to_json(),
        }
    }

    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(value) => Value::Bool(*value),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(value) => Value::Integer(value),
                None => Value::Double(number.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(value) => Value::String(value.clone()),
            serde_json::Value::Array(values) => {
                Value::Array(values.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Map(Document::from_json_map(map)),
        }
    }

    fn resolve_server_timestamps(&mut self, now: DateTime<Utc>) {
        match self {
            Value::ServerTimestamp => *self = Value::Timestamp(now),
            Value::Array(values) => values
                .iter_mut()
                .for_each(|value| value.resolve_server_timestamps(now)),
            Value::Map(document) => document.resolve_server_timestamps(now),
            _ => {}
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Map(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

/// Field name to value mapping, kept in key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: BTreeMap<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<Value>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Dotted paths of every `ServerTimestamp` sentinel, nested maps included.
    pub fn server_timestamp_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_server_timestamp_paths(self, "", &mut paths);
        paths
    }

    /// Copy of the document with every server timestamp sentinel removed.
    pub fn without_server_timestamps(&self) -> Document {
        let fields = self
            .fields
            .iter()
            .filter(|(_, value)| !matches!(value, Value::ServerTimestamp))
            .map(|(key, value)| match value {
                Value::Map(nested) => (key.clone(), Value::Map(nested.without_server_timestamps())),
                other => (key.clone(), other.clone()),
            })
            .collect();
        Document { fields }
    }

    pub fn resolve_server_timestamps(&mut self, now: DateTime<Utc>) {
        self.fields
            .values_mut()
            .for_each(|value| value.resolve_server_timestamps(now));
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }

    pub fn from_json_map(map: &serde_json::Map<String, serde_json::Value>) -> Self {
        let fields = map
            .iter()
            .map(|(key, value)| (key.clone(), Value::from_json(value)))
            .collect();
        Document { fields }
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document {
            fields: iter.into_iter().collect(),
        }
    }
}

fn collect_server_timestamp_paths(document: &Document, prefix: &str, paths: &mut Vec<String>) {
    for (key, value) in &document.fields {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::ServerTimestamp => paths.push(path),
            Value::Map(nested) => collect_server_timestamp_paths(nested, &path, paths),
            _ => {}
        }
    }
}

/// A document as read back from a store, together with its key.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: Document,
}
