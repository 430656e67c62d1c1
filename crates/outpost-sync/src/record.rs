use crate::key;

use indexmap::IndexMap;
use outpost_core::{
    schema::FieldType,
    stmt::{self, Data, Value},
    Table,
};
use serde_json::Value as Json;

/// A decoded item of the wire tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Name of the table the item belongs to
    pub table: String,

    /// Identity of the item. Generated when the item carries none.
    pub uuid: String,

    /// Typed field values, ready to be written through the table
    pub data: Data,

    /// Foreign keys by field name
    pub references: IndexMap<String, Reference>,

    /// Download URLs of attachments by field name
    pub files: IndexMap<String, String>,
}

/// A foreign key to another item, by table and uuid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub table: String,
    pub uuid: String,
}

impl Record {
    /// Decodes `item` against the fields of `table`.
    ///
    /// Nested collections, unknown fields and values that do not convert to
    /// their field's type are left out.
    pub fn new(table: &Table, item: &Json) -> Record {
        let mut record = Record {
            table: table.name.clone(),
            uuid: String::new(),
            data: Data::new(),
            references: IndexMap::new(),
            files: IndexMap::new(),
        };

        if let Some(object) = item.as_object() {
            for (name, value) in object {
                if name.starts_with(key::TABLE_PREFIX) {
                    continue;
                }

                if name.starts_with(key::META_PREFIX) {
                    record.decode_meta(name, value);
                } else {
                    let name = name.strip_prefix(key::KEY_PREFIX).unwrap_or(name);
                    record.decode_field(table, name, value);
                }
            }
        }

        if record.uuid.is_empty() {
            record.uuid = uuid::Uuid::new_v4().to_string();
            record.data.insert("uuid", record.uuid.as_str());
        }

        record
    }

    fn decode_meta(&mut self, name: &str, value: &Json) {
        let field = match name {
            key::UUID => {
                if let Some(uuid) = text(value).filter(|uuid| !uuid.is_empty()) {
                    self.data.insert("uuid", uuid.as_str());
                    self.uuid = uuid;
                }
                return;
            }
            key::CREATED_ON => "created_on",
            key::MODIFIED_ON => "modified_on",
            _ => return,
        };

        match value.as_str().and_then(stmt::parse_datetime) {
            Some(datetime) => {
                self.data.insert(field, datetime);
            }
            None => {
                tracing::debug!(table = %self.table, attribute = name, %value, "dropping unparseable timestamp");
            }
        }
    }

    fn decode_field(&mut self, table: &Table, name: &str, value: &Json) {
        if value.is_null() {
            return;
        }

        let Some(field) = table.field(name) else {
            tracing::debug!(table = %table.name, field = name, "dropping value of unknown field");
            return;
        };

        match &field.ty {
            FieldType::Upload => {
                match value
                    .get(key::URL)
                    .and_then(Json::as_str)
                    .filter(|url| !url.is_empty())
                {
                    Some(url) => {
                        self.files.insert(name.to_string(), url.to_string());
                    }
                    None => {
                        tracing::debug!(table = %table.name, field = name, "attachment without url");
                    }
                }
                return;
            }
            FieldType::Reference(fk) => {
                let uuid = value.get(key::UUID).and_then(Json::as_str);

                match (fk, uuid) {
                    (Some(fk), Some(uuid)) => {
                        self.references.insert(
                            name.to_string(),
                            Reference {
                                table: fk.table.clone(),
                                uuid: uuid.to_string(),
                            },
                        );
                    }
                    _ => {
                        tracing::debug!(table = %table.name, field = name, "dropping unresolvable reference");
                    }
                }
                return;
            }
            _ => {}
        }

        match convert(&field.ty, unwrap(value)) {
            Some(value) => {
                self.data.insert(name, value);
            }
            None => {
                tracing::debug!(table = %table.name, field = name, ty = %field.ty, %value, "dropping value");
            }
        }
    }
}

/// Strips the `@value` (or legacy `$`) wrapper of a typed scalar.
fn unwrap(value: &Json) -> &Json {
    value
        .get(key::VALUE)
        .or_else(|| value.get(key::LEGACY_VALUE))
        .unwrap_or(value)
}

fn convert(ty: &FieldType, value: &Json) -> Option<Value> {
    if value.is_null() {
        return None;
    }

    match ty {
        FieldType::Boolean => Some(Value::Bool(match value {
            Json::String(text) => text.eq_ignore_ascii_case("true"),
            value => Value::from(value.clone()).is_truthy(),
        })),
        FieldType::Integer => match value {
            Json::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(truncate))
                .map(Value::Integer),
            Json::String(text) => parse_integer(text).map(Value::Integer),
            _ => None,
        },
        FieldType::Double => match value {
            Json::Number(n) => n.as_f64().map(Value::Double),
            Json::String(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Value::Double),
            _ => None,
        },
        FieldType::Date => value.as_str().and_then(stmt::parse_date).map(Value::Date),
        FieldType::DateTime => value
            .as_str()
            .and_then(stmt::parse_datetime)
            .map(Value::DateTime),
        FieldType::String | FieldType::Text => text(value).map(Value::Text),
        _ => None,
    }
}

/// Integers may arrive as decimal text; the fraction is truncated.
fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();

    text.parse::<i64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().and_then(truncate))
}

/// Drops the fraction. `None` when the result does not fit an `i64`.
fn truncate(n: f64) -> Option<i64> {
    // 2^63 is exact as f64; i64::MAX is not
    const BOUND: f64 = 9_223_372_036_854_775_808.0;

    let n = n.trunc();
    (n.is_finite() && n >= -BOUND && n < BOUND).then_some(n as i64)
}

/// Text form of a scalar.
fn text(value: &Json) -> Option<String> {
    match value {
        Json::String(text) => Some(text.clone()),
        Json::Number(n) => Some(n.to_string()),
        Json::Bool(v) => Some(v.to_string()),
        _ => None,
    }
}
