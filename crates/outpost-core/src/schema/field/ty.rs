use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Declared type of a field.
///
/// Parsed from the type tag of a server-side field description, e.g.
/// `"string"`, `"datetime"` or `"reference org_organisation.uuid"`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Local row identity
    Id,

    #[default]
    String,
    Text,
    Boolean,
    Integer,
    Double,
    Date,
    DateTime,
    Json,

    /// File attachment, stored as a local file URI
    Upload,

    /// Foreign key. `None` when the type tag does not name a table.
    Reference(Option<ForeignKey>),

    /// Any type tag Outpost does not interpret
    Other(String),
}

/// Target of a reference field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: String,
    pub key: String,
}

impl FieldType {
    pub fn parse(tag: &str) -> FieldType {
        let mut parts = tag.split_whitespace();

        match parts.next().unwrap_or("string") {
            "id" => FieldType::Id,
            "string" => FieldType::String,
            "text" => FieldType::Text,
            "boolean" => FieldType::Boolean,
            "integer" => FieldType::Integer,
            "double" => FieldType::Double,
            "date" => FieldType::Date,
            "datetime" => FieldType::DateTime,
            "json" => FieldType::Json,
            "upload" => FieldType::Upload,
            "reference" => FieldType::Reference(parts.next().map(|lookup| {
                match lookup.split_once('.') {
                    Some((table, key)) => ForeignKey {
                        table: table.to_string(),
                        key: key.to_string(),
                    },
                    None => ForeignKey {
                        table: lookup.to_string(),
                        key: "id".to_string(),
                    },
                }
            })),
            _ => FieldType::Other(tag.to_string()),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, FieldType::Reference(_))
    }

    pub fn is_upload(&self) -> bool {
        matches!(self, FieldType::Upload)
    }

    pub fn foreign_key(&self) -> Option<&ForeignKey> {
        match self {
            FieldType::Reference(fk) => fk.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Id => f.write_str("id"),
            FieldType::String => f.write_str("string"),
            FieldType::Text => f.write_str("text"),
            FieldType::Boolean => f.write_str("boolean"),
            FieldType::Integer => f.write_str("integer"),
            FieldType::Double => f.write_str("double"),
            FieldType::Date => f.write_str("date"),
            FieldType::DateTime => f.write_str("datetime"),
            FieldType::Json => f.write_str("json"),
            FieldType::Upload => f.write_str("upload"),
            FieldType::Reference(None) => f.write_str("reference"),
            FieldType::Reference(Some(fk)) if fk.key == "id" => {
                write!(f, "reference {}", fk.table)
            }
            FieldType::Reference(Some(fk)) => write!(f, "reference {}.{}", fk.table, fk.key),
            FieldType::Other(tag) => f.write_str(tag),
        }
    }
}

impl FromStr for FieldType {
    type Err = std::convert::Infallible;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Ok(FieldType::parse(tag))
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(FieldType::parse(&tag))
    }
}
