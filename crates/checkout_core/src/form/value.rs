use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::FormError;

/// Untyped scalar held by a form field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// No value at all. Distinct from `Bool(false)` and `Number(0.0)`.
    #[default]
    Absent,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl FieldValue {
    /// Text form used for pattern matching and display.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Absent => Cow::Borrowed(""),
            FieldValue::Text(text) => Cow::Borrowed(text.as_str()),
            FieldValue::Number(number) => Cow::Owned(number.to_string()),
            FieldValue::Bool(flag) => Cow::Owned(flag.to_string()),
        }
    }

    /// True for `Absent` and for whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Number(_) | FieldValue::Bool(_) => false,
        }
    }

    /// Checked-flag reading. Text is false when blank or one of `false`,
    /// `0`, `off` or `no` (case-insensitive).
    pub fn as_bool(&self) -> bool {
        match self {
            FieldValue::Absent => false,
            FieldValue::Text(text) => {
                let text = text.trim();
                !(text.is_empty()
                    || ["false", "0", "off", "no"]
                        .iter()
                        .any(|falsy| text.eq_ignore_ascii_case(falsy)))
            }
            FieldValue::Number(number) => *number != 0.0 && !number.is_nan(),
            FieldValue::Bool(flag) => *flag,
        }
    }

    /// Numeric reading of the value. Text is trimmed and parsed; blank text
    /// and non-numeric text yield `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(number) if !number.is_nan() => Some(*number),
            FieldValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|number| !number.is_nan())
            }
            _ => None,
        }
    }

    /// Convert to the same kind of scalar as `shape`. Text fields take the
    /// text form of numbers and flags; `Absent` shapes leave the value as is.
    pub fn coerce_like(&self, shape: &FieldValue) -> FieldValue {
        match shape {
            FieldValue::Absent => self.clone(),
            FieldValue::Text(_) => FieldValue::Text(self.text().into_owned()),
            FieldValue::Bool(_) => FieldValue::Bool(self.as_bool()),
            FieldValue::Number(_) => self
                .as_number()
                .map(FieldValue::Number)
                .unwrap_or_else(|| self.clone()),
        }
    }

    pub(crate) fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Absent,
            Value::Bool(flag) => FieldValue::Bool(*flag),
            Value::Number(number) => number
                .as_f64()
                .map(FieldValue::Number)
                .unwrap_or(FieldValue::Absent),
            Value::String(text) => FieldValue::Text(text.clone()),
            other => FieldValue::Text(other.to_string()),
        }
    }

    pub(crate) fn to_json(&self) -> Value {
        match self {
            FieldValue::Absent => Value::Null,
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::Number(number) => Number::from_f64(*number)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Bool(flag) => Value::Bool(*flag),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

/// Snapshot of every field value in a form, keyed by field name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormValues {
    fields: BTreeMap<String, FieldValue>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build values from any record that serializes to a flat JSON object.
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self, FormError> {
        let json = serde_json::to_value(record).map_err(|err| FormError::Record(err.to_string()))?;
        let Value::Object(object) = json else {
            return Err(FormError::Record(
                "record must serialize to an object".to_string(),
            ));
        };
        Ok(Self {
            fields: object
                .iter()
                .map(|(name, value)| (name.clone(), FieldValue::from_json(value)))
                .collect(),
        })
    }

    /// Rebuild a typed record from the current values.
    pub fn to_record<T: DeserializeOwned>(&self) -> Result<T, FormError> {
        let object = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect::<Map<String, Value>>();
        serde_json::from_value(Value::Object(object)).map_err(|err| FormError::Record(err.to_string()))
    }

    /// Copy of these values with each field coerced to the kind of scalar
    /// `shape` holds for it. Fields missing from `shape` are copied as is.
    pub fn coerced_to(&self, shape: &FormValues) -> FormValues {
        Self {
            fields: self
                .fields
                .iter()
                .map(|(name, value)| {
                    let value = match shape.get(name) {
                        Some(kind) => value.coerce_like(kind),
                        None => value.clone(),
                    };
                    (name.clone(), value)
                })
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FormValues
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
