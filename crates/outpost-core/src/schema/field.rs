mod default;
pub use default::DefaultValue;

mod description;
pub use description::{FieldDescription, FieldOptions};

mod ty;
pub use ty::{FieldType, ForeignKey};

use crate::{
    stmt::{self, ExprAssert, ExprField, SelectOptions, Value},
    Db, Error, Result,
};

use std::fmt;

/// A typed column of a [`Table`](crate::Table).
///
/// A field created with [`Field::new`] is detached: it belongs to no table
/// and serves as a template. Adding it to a table attaches it; reusing a
/// field for another table goes through [`Field::clone_detached`].
#[derive(Debug, Clone)]
pub struct Field {
    /// Name of the field, unique within its table
    pub name: String,

    /// Declared type
    pub ty: FieldType,

    /// Whether the field is shown in forms
    pub readable: bool,

    /// Whether the field can be edited in forms
    pub writable: bool,

    /// Value written on insert when the record does not carry one
    pub default_value: Option<DefaultValue>,

    /// Value written on update when the record does not carry one
    pub update_value: Option<DefaultValue>,

    /// True for the identity field and the shared meta-fields
    pub meta: bool,

    description: FieldDescription,

    /// Name of the owning table; `None` while detached
    table: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, description: FieldDescription) -> Field {
        Field {
            name: name.into(),
            ty: description.ty.clone().unwrap_or_default(),
            readable: description.readable != Some(false),
            writable: description.writable != Some(false),
            default_value: description.default_value.clone(),
            update_value: description.update_value.clone(),
            meta: false,
            description,
            table: None,
        }
    }

    /// Creates a meta-field.
    pub fn meta(name: impl Into<String>, description: FieldDescription) -> Field {
        Field {
            meta: true,
            ..Field::new(name, description)
        }
    }

    pub(crate) fn attach(&mut self, table: &str) {
        self.table = Some(table.to_string());
    }

    /// Name of the owning table.
    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn is_detached(&self) -> bool {
        self.table.is_none()
    }

    /// A reference to this field for use in projections and expressions.
    pub fn expr(&self) -> ExprField {
        ExprField::new(self.table.as_deref().unwrap_or("<no table>"), &self.name)
    }

    /// SQL identifier of the field, `table.field`.
    pub fn to_sql(&self) -> String {
        self.expr().to_string()
    }

    /// Asserts that the field equals `value`.
    pub fn equals(&self, value: impl Into<Value>) -> ExprAssert {
        let value = value.into();
        if value.is_null() {
            ExprAssert::new(format!("{} IS NULL", self.to_sql()))
        } else {
            ExprAssert::new(format!("{} = {}", self.to_sql(), self.sql_encode(&value)))
        }
    }

    /// Encodes `value` as a SQL literal suitable to query this field.
    ///
    /// Values the type-specific conversion cannot handle fall back to a
    /// quoted string literal.
    pub fn sql_encode(&self, value: &Value) -> String {
        if value.is_null() {
            return "NULL".to_string();
        }

        let encoded = match &self.ty {
            FieldType::Id | FieldType::Reference(_) => {
                value.to_number().map(|n| n.abs().to_string())
            }
            FieldType::Boolean => Some(if value.is_truthy() { "1" } else { "0" }.to_string()),
            FieldType::Date => match value {
                Value::Date(date) => Some(quoted(&stmt::format_date(date))),
                Value::DateTime(datetime) => {
                    Some(quoted(&stmt::format_date(&datetime.date_naive())))
                }
                _ => None,
            },
            FieldType::DateTime => match value {
                Value::DateTime(datetime) => Some(quoted(&stmt::format_datetime(datetime))),
                Value::Date(date) => Some(quoted(&stmt::format_datetime(
                    &date.and_time(chrono::NaiveTime::MIN).and_utc(),
                ))),
                _ => None,
            },
            FieldType::Integer | FieldType::Double => value.to_number().map(|n| n.to_string()),
            FieldType::Json => Some(match value {
                Value::Text(text) => quoted(text),
                value => quoted(&value.to_json().to_string()),
            }),
            FieldType::String
            | FieldType::Text
            | FieldType::Upload
            | FieldType::Other(_) => Some(quoted(&value.to_text())),
        };

        encoded.unwrap_or_else(|| {
            tracing::warn!(
                field = %self.to_sql(),
                ty = %self.ty,
                value = value.type_name(),
                "value does not convert to the field type; encoding as string literal"
            );
            quoted(&value.to_text())
        })
    }

    /// Target table and key of a reference field.
    pub fn foreign_key(&self) -> Option<&ForeignKey> {
        self.ty.foreign_key()
    }

    /// True for reference fields and fields with an options list.
    pub fn has_options(&self) -> bool {
        self.ty.is_reference() || self.description.options.is_some()
    }

    /// Loads the selectable options as `(value, label)` pairs.
    ///
    /// For a reference field the rows of the referenced table are labelled
    /// with its `represent` fields, else its `name` field, else the key.
    /// Resolves to `None` when the field has no options or the referenced
    /// table is not available.
    pub async fn options(&self, db: &Db) -> Result<Option<Vec<(Value, String)>>> {
        if !self.ty.is_reference() {
            return Ok(self.description.options.as_ref().map(FieldOptions::to_pairs));
        }

        let Some(fk) = self.foreign_key() else {
            return Ok(None);
        };

        let Some(lookup) = db.table(&fk.table) else {
            tracing::debug!(field = %self.to_sql(), table = %fk.table, "look-up table not available");
            return Ok(None);
        };

        let mut represent = self.description.represent.clone().unwrap_or_default();
        if represent.is_empty() {
            if lookup.field("name").is_some() {
                represent.push("name".to_string());
            } else {
                represent.push(fk.key.clone());
            }
        }

        let mut columns = represent.clone();
        if !columns.contains(&fk.key) {
            columns.push(fk.key.clone());
        }
        let columns = columns
            .iter()
            .map(|name| lookup.column(name))
            .collect::<Result<Vec<_>>>()?;

        let rows = lookup
            .select(db, columns, SelectOptions::default())
            .await?;

        let options = rows
            .into_iter()
            .map(|row| {
                let key = row
                    .column(&ExprField::new(&lookup.name, &fk.key))
                    .cloned()
                    .unwrap_or_default();

                let labels = represent
                    .iter()
                    .filter_map(|name| row.column(&ExprField::new(&lookup.name, name)))
                    .filter(|value| value.is_truthy())
                    .map(Value::to_text)
                    .collect::<Vec<_>>();

                let label = if labels.is_empty() {
                    key.to_text()
                } else {
                    labels.join(" ")
                };

                (key, label)
            })
            .collect();

        Ok(Some(options))
    }

    /// Serializable copy of the description. Computed defaults are dropped.
    pub fn description(&self) -> FieldDescription {
        let mut description = self.description.clone();

        description.ty = Some(self.ty.clone());
        if description.default_value.as_ref().is_some_and(DefaultValue::is_computed) {
            description.default_value = None;
        }
        if description.update_value.as_ref().is_some_and(DefaultValue::is_computed) {
            description.update_value = None;
        }

        description
    }

    /// Inherits identity and attributes from `base`.
    ///
    /// Name, type and the meta flag always come from `base`. Readable,
    /// writable, the description and the defaults come from `base` unless
    /// this field's own description sets them.
    pub fn inherit(&mut self, base: &Field) {
        self.name = base.name.clone();
        self.ty = base.ty.clone();
        self.meta = base.meta;

        self.readable = self.description.readable.unwrap_or(base.readable);
        self.writable = self.description.writable.unwrap_or(base.writable);

        self.description = self.description.merged_over(&base.description);

        if self.default_value.is_none() {
            self.default_value = base.default_value.clone();
        }
        if self.update_value.is_none() {
            self.update_value = base.update_value.clone();
        }
    }

    /// A detached copy of this field, ready to be added to another table.
    pub fn clone_detached(&self) -> Field {
        Field {
            table: None,
            ..self.clone()
        }
    }

    /// Formats a value for export to the server.
    ///
    /// Dates become `YYYY-MM-DD`, datetimes ISO-8601 UTC text and JSON
    /// fields serialized JSON text. Everything else passes through.
    pub fn format(&self, value: &Value) -> Value {
        match (&self.ty, value) {
            (_, Value::Null) => Value::Null,
            (FieldType::Date, Value::Date(date)) => Value::Text(stmt::format_date(date)),
            (FieldType::Date, Value::DateTime(datetime)) => {
                Value::Text(stmt::format_date(&datetime.date_naive()))
            }
            (FieldType::DateTime, Value::DateTime(datetime)) => {
                Value::Text(stmt::format_datetime(datetime))
            }
            (FieldType::DateTime, Value::Date(date)) => Value::Text(stmt::format_datetime(
                &date.and_time(chrono::NaiveTime::MIN).and_utc(),
            )),
            (FieldType::Json, value) => Value::Text(value.to_json().to_string()),
            (_, value) => value.clone(),
        }
    }

    /// Parses a value received from the server.
    ///
    /// Only date and datetime fields convert; datetimes without a zone
    /// offset are read as UTC.
    pub fn parse(&self, value: Value) -> Result<Value> {
        match (&self.ty, value) {
            (_, Value::Null) => Ok(Value::Null),
            (FieldType::Date, Value::Text(text)) => stmt::parse_date(&text)
                .map(Value::Date)
                .ok_or_else(|| Error::type_conversion(Value::Text(text), "date")),
            (FieldType::Date, Value::Date(date)) => Ok(Value::Date(date)),
            (FieldType::Date, Value::DateTime(datetime)) => Ok(Value::Date(datetime.date_naive())),
            (FieldType::Date, value) => Err(Error::type_conversion(value, "date")),
            (FieldType::DateTime, Value::Text(text)) => stmt::parse_datetime(&text)
                .map(Value::DateTime)
                .ok_or_else(|| Error::type_conversion(Value::Text(text), "datetime")),
            (FieldType::DateTime, Value::DateTime(datetime)) => Ok(Value::DateTime(datetime)),
            (FieldType::DateTime, value) => Err(Error::type_conversion(value, "datetime")),
            (_, value) => Ok(value),
        }
    }

    /// Converts a raw storage value to the declared type of the field.
    ///
    /// Storage keeps booleans as integers and dates, datetimes and JSON as
    /// text. Values that do not convert are returned unchanged.
    pub fn load(&self, value: Value) -> Value {
        match (&self.ty, value) {
            (FieldType::Boolean, Value::Integer(v)) => Value::Bool(v != 0),
            (FieldType::Double, Value::Integer(v)) => Value::Double(v as f64),
            (FieldType::Date, Value::Text(text)) => match stmt::parse_date(&text) {
                Some(date) => Value::Date(date),
                None => Value::Text(text),
            },
            (FieldType::DateTime, Value::Text(text)) => match stmt::parse_datetime(&text) {
                Some(datetime) => Value::DateTime(datetime),
                None => Value::Text(text),
            },
            (FieldType::Json, Value::Text(text)) => match serde_json::from_str(&text) {
                Ok(json) => Value::Json(json),
                Err(_) => Value::Text(text),
            },
            (_, value) => value,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.expr(), f)
    }
}

fn quoted(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
