//! Schemaless row and value model.
//!
//! The store enforces no fixed schema, so a row is represented as an
//! insertion-ordered mapping from field name to a tagged scalar value.
//! Field names are compared case-insensitively everywhere; the first
//! spelling seen for a name is the one that survives.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A single scalar property value carried by a row.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Map a decoded JSON scalar onto a tagged value. Objects and arrays
    /// never occur in table-store rows; they collapse to their JSON text
    /// so nothing is silently dropped.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Integer(i)
                } else {
                    FieldValue::Number(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => FieldValue::Text(s),
            other => FieldValue::Text(other.to_string()),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Integer(i) => serializer.serialize_i64(*i),
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Boolean(b) => serializer.serialize_bool(*b),
            FieldValue::Timestamp(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            FieldValue::Null => serializer.serialize_none(),
        }
    }
}

/// One row of a table: system fields plus whatever dynamic properties
/// the row happens to carry. Serializes as a flat JSON object.
#[derive(Debug, Clone, Default)]
pub struct Row {
    fields: Vec<(String, FieldValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Insert or replace a field. Replacement is case-insensitive and
    /// keeps the original spelling of the name.
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        if let Some(slot) = self
            .fields
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Case-insensitive field lookup.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The row's partition key, when present as text.
    pub fn partition_key(&self) -> Option<&str> {
        match self.get(crate::PARTITION_KEY) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// The row's row key, when present as text.
    pub fn row_key(&self) -> Option<&str> {
        match self.get(crate::ROW_KEY) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl FromIterator<(String, FieldValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.set(name, value);
        }
        row
    }
}

/// Opaque cursor issued by the store to resume a paged query.
///
/// Never inspected, parsed, or constructed by consumers; only the store
/// implementation that minted a token may look inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    /// Wrap a raw token string. Empty input means "no token".
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn set_replaces_case_insensitively_keeping_first_spelling() {
        let mut row = Row::new();
        row.set("CpuPercent", FieldValue::Number(12.5));
        row.set("cpupercent", FieldValue::Number(99.0));
        assert_eq!(row.len(), 1);
        assert_eq!(row.field_names().collect::<Vec<_>>(), vec!["CpuPercent"]);
        assert_eq!(row.get("CPUPERCENT"), Some(&FieldValue::Number(99.0)));
    }

    #[test]
    fn serializes_as_flat_object_in_insertion_order() {
        let mut row = Row::new();
        row.set("PartitionKey", FieldValue::Text("srv-01".into()));
        row.set("RowKey", FieldValue::Text("0001".into()));
        row.set("CpuPercent", FieldValue::Number(43.2));
        row.set("Healthy", FieldValue::Boolean(true));
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"PartitionKey":"srv-01","RowKey":"0001","CpuPercent":43.2,"Healthy":true}"#
        );
    }

    #[test]
    fn timestamps_serialize_as_rfc3339() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();
        let mut row = Row::new();
        row.set("Timestamp", FieldValue::Timestamp(ts));
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["Timestamp"], "2024-05-17T08:30:00.000Z");
    }

    #[test]
    fn json_scalars_map_to_tagged_values() {
        assert_eq!(FieldValue::from_json(serde_json::json!(7)), FieldValue::Integer(7));
        assert_eq!(FieldValue::from_json(serde_json::json!(2.5)), FieldValue::Number(2.5));
        assert_eq!(FieldValue::from_json(serde_json::json!(true)), FieldValue::Boolean(true));
        assert_eq!(FieldValue::from_json(serde_json::Value::Null), FieldValue::Null);
        assert_eq!(
            FieldValue::from_json(serde_json::json!("up")),
            FieldValue::Text("up".into())
        );
    }

    #[test]
    fn empty_continuation_token_is_none() {
        assert!(ContinuationToken::new("").is_none());
        assert_eq!(ContinuationToken::new("abc").unwrap().as_str(), "abc");
    }
}
