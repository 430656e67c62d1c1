//! Reserved names and the fields Outpost injects into tables.

use super::{DefaultValue, Field, FieldDescription, FieldType, Settings, Table};
use crate::{stmt::Value, Result};

use chrono::Utc;

/// Tables whose name starts with this prefix are internal.
pub const RESERVED_PREFIX: &str = "em_";

/// Persists the schema of every table.
pub const SCHEMA_TABLE: &str = "em_schema";

/// Holds the schema version. The only table without an identity field.
pub const VERSION_TABLE: &str = "em_version";

/// Name of the identity field.
pub const IDENTITY: &str = "id";

/// Generic key that substitutes the parent key of object-type hooks.
pub const OBJECT_KEY: &str = "em_object_id";

pub fn is_system_table(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX)
}

/// The local row identity.
pub fn identity_field() -> Field {
    Field::meta(
        IDENTITY,
        FieldDescription::new(FieldType::Id)
            .readable(false)
            .writable(false),
    )
}

/// The meta-fields shared by every user table.
pub fn meta_fields() -> Vec<Field> {
    let now = || DefaultValue::computed(|| Value::DateTime(Utc::now()));

    vec![
        Field::meta(
            "uuid",
            FieldDescription::new(FieldType::String)
                .readable(false)
                .writable(false)
                .default_value(DefaultValue::computed(|| {
                    Value::Text(uuid::Uuid::new_v4().to_string())
                })),
        ),
        Field::meta(
            "created_on",
            FieldDescription::new(FieldType::DateTime)
                .readable(false)
                .writable(false)
                .default_value(now()),
        ),
        Field::meta(
            "modified_on",
            FieldDescription::new(FieldType::DateTime)
                .readable(false)
                .writable(false)
                .default_value(now())
                .update_value(now()),
        ),
        Field::meta(
            "synchronized_on",
            FieldDescription::new(FieldType::DateTime)
                .readable(false)
                .writable(false),
        ),
    ]
}

/// Definition of the schema table.
pub fn schema_table() -> Result<Table> {
    Table::new(
        SCHEMA_TABLE,
        vec![
            Field::new("name", FieldDescription::new(FieldType::String)),
            Field::new("fields", FieldDescription::new(FieldType::Json)),
            Field::new("settings", FieldDescription::new(FieldType::Json)),
        ],
        Settings::default(),
    )
}

/// Definition of the versioning table.
pub fn version_table() -> Result<Table> {
    Table::new(
        VERSION_TABLE,
        vec![Field::new("version", FieldDescription::new(FieldType::String))],
        Settings::default(),
    )
}
