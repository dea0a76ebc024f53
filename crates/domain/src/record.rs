use std::fmt::{Display, Formatter};

use hoso_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema-less field map representing one row of any record type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenericRecord(Map<String, Value>);

impl GenericRecord {
    /// Creates a record from a field map.
    #[must_use]
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Creates a record from a JSON value that must be an object.
    pub fn from_value(value: Value) -> AppResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(AppError::Validation(format!(
                "record payload must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Sets a field value, returning the previous one.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// Returns whether the record carries a non-null value for the field.
    #[must_use]
    pub fn has_value(&self, field: &str) -> bool {
        self.0.get(field).is_some_and(|value| !value.is_null())
    }

    /// Returns the textual rendering of a field, used for key and filter matching.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<String> {
        self.0.get(field).and_then(value_text)
    }

    /// Overwrites the fields present in `partial`, leaving the others untouched.
    pub fn merge(&mut self, partial: &GenericRecord) {
        for (field, value) in &partial.0 {
            self.0.insert(field.clone(), value.clone());
        }
    }

    /// Returns the field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the underlying field map.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Converts the record into a JSON object value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Renders a scalar JSON value as text; null, arrays and objects have no rendering.
#[must_use]
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Primary-key value of a record, in its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey(String);

impl RecordKey {
    /// Creates a validated record key.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "record key must not be empty".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RecordKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{GenericRecord, RecordKey, value_text};

    #[test]
    fn rejects_non_object_payload() {
        assert!(GenericRecord::from_value(json!(["a"])).is_err());
        assert!(GenericRecord::from_value(json!({"ma": "BLHS"})).is_ok());
    }

    #[test]
    fn merge_only_touches_supplied_fields() {
        let mut record = GenericRecord::from_value(json!({"id": 1, "tieu_de": "A", "mo_ta": "x"}))
            .unwrap_or_default();
        let partial = GenericRecord::from_value(json!({"mo_ta": "y"})).unwrap_or_default();

        record.merge(&partial);

        assert_eq!(record.get("tieu_de"), Some(&json!("A")));
        assert_eq!(record.get("mo_ta"), Some(&json!("y")));
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn numbers_render_as_key_text() {
        assert_eq!(value_text(&json!(42)), Some("42".to_owned()));
        assert_eq!(value_text(&json!(null)), None);
        let record = GenericRecord::from_value(json!({"id": 7})).unwrap_or_default();
        assert_eq!(record.text("id"), Some("7".to_owned()));
    }

    #[test]
    fn blank_record_key_is_rejected() {
        assert!(RecordKey::new(" ").is_err());
        assert!(matches!(RecordKey::new("BLHS-2015"), Ok(key) if key.as_str() == "BLHS-2015"));
    }
}
