use super::{format_date, format_datetime};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A dynamically typed field value.
///
/// The set of variants mirrors the field types a server-defined schema can
/// declare. Values read back from storage start out as the raw storage
/// representation (integers, reals and text) and are converted to their
/// declared type by [`Field::load`](crate::Field::load).
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Calendar date without a time zone
    Date(NaiveDate),

    /// An instant in time, always normalized to UTC
    DateTime(DateTime<Utc>),

    /// Double-precision floating point number
    Double(f64),

    /// Signed 64-bit integer
    Integer(i64),

    /// Arbitrary JSON document
    Json(serde_json::Value),

    /// Null value
    #[default]
    Null,

    /// Text value
    Text(String),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Double(_) => "double",
            Self::Integer(_) => "integer",
            Self::Json(_) => "json",
            Self::Null => "null",
            Self::Text(_) => "text",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Truthiness as understood by the wire format and the storage layer:
    /// null, `false`, zero, NaN and the empty string are false, everything
    /// else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(v) => *v,
            Self::Integer(v) => *v != 0,
            Self::Double(v) => *v != 0.0 && !v.is_nan(),
            Self::Text(v) => !v.is_empty(),
            Self::Date(_) | Self::DateTime(_) => true,
            Self::Json(json) => match json {
                serde_json::Value::Null => false,
                serde_json::Value::Bool(v) => *v,
                serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
                serde_json::Value::String(s) => !s.is_empty(),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
            },
        }
    }

    /// Numeric coercion. Text is accepted when it parses as a number;
    /// booleans count as 0 and 1.
    pub fn to_number(&self) -> Option<Number> {
        match self {
            Self::Integer(v) => Some(Number::Integer(*v)),
            Self::Double(v) if v.is_finite() => Some(Number::Double(*v)),
            Self::Bool(v) => Some(Number::Integer(*v as i64)),
            Self::Text(v) => {
                let v = v.trim();
                if let Ok(n) = v.parse::<i64>() {
                    Some(Number::Integer(n))
                } else {
                    v.parse::<f64>()
                        .ok()
                        .filter(|n| n.is_finite())
                        .map(Number::Double)
                }
            }
            Self::Json(serde_json::Value::Number(n)) => match n.as_i64() {
                Some(n) => Some(Number::Integer(n)),
                None => n.as_f64().map(Number::Double),
            },
            _ => None,
        }
    }

    /// Plain text rendering of the value.
    pub fn to_text(&self) -> String {
        match self {
            Self::Bool(v) => v.to_string(),
            Self::Date(v) => format_date(v),
            Self::DateTime(v) => format_datetime(v),
            Self::Double(v) => v.to_string(),
            Self::Integer(v) => v.to_string(),
            Self::Json(serde_json::Value::String(v)) => v.clone(),
            Self::Json(v) => v.to_string(),
            Self::Null => "null".to_string(),
            Self::Text(v) => v.clone(),
        }
    }

    /// Converts the value into its JSON representation. Dates and datetimes
    /// become their canonical text form.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(v) => serde_json::Value::Bool(*v),
            Self::Date(v) => serde_json::Value::String(format_date(v)),
            Self::DateTime(v) => serde_json::Value::String(format_datetime(v)),
            Self::Double(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Integer(v) => serde_json::Value::from(*v),
            Self::Json(v) => v.clone(),
            Self::Null => serde_json::Value::Null,
            Self::Text(v) => serde_json::Value::String(v.clone()),
        }
    }
}

/// Result of [`Value::to_number`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Double(f64),
}

impl Number {
    pub fn abs(self) -> Number {
        match self {
            Number::Integer(v) => match v.checked_abs() {
                Some(v) => Number::Integer(v),
                None => Number::Double((v as f64).abs()),
            },
            Number::Double(v) => Number::Double(v.abs()),
        }
    }
}

impl core::fmt::Display for Number {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Number::Integer(v) => write!(f, "{v}"),
            Number::Double(v) => write!(f, "{v}"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

// === Conversions ===

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Value::from(value),
            None => Value::Null,
        }
    }
}

/// Scalars map onto their natural variant; arrays and objects are kept as
/// [`Value::Json`].
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(v) => Value::Integer(v),
                None => n.as_f64().map(Value::Double).unwrap_or(Value::Null),
            },
            serde_json::Value::String(v) => Value::Text(v),
            json => Value::Json(json),
        }
    }
}
