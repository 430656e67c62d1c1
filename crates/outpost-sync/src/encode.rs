use crate::key;

use indexmap::IndexMap;
use outpost_core::{
    schema::FieldType,
    stmt::{Data, Value},
    Table,
};
use serde_json::{json, Map, Value as Json};

/// A local record mapped to the wire shape.
///
/// Foreign keys and attachments are held back: the caller resolves the
/// referenced uuids and uploads the files, then adds them with
/// [`add_reference`] and [`add_file`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EncodedRecord {
    /// The wire item, without foreign keys and attachments
    pub data: Map<String, Json>,

    /// Target table and local key of each reference field
    pub references: IndexMap<String, (String, Value)>,

    /// Local value of each attachment field
    pub files: IndexMap<String, Value>,
}

/// Maps `record`, a row of `table`, to the wire shape.
///
/// Nulls and unknown fields are omitted. Of the meta-fields only the uuid
/// and the creation and modification timestamps are sent.
pub fn encode_record(table: &Table, record: &Data) -> EncodedRecord {
    let mut encoded = EncodedRecord::default();

    for (name, value) in record.iter() {
        if value.is_null() {
            continue;
        }

        let Some(field) = table.field(name) else {
            continue;
        };

        if field.meta {
            let attribute = match name {
                "uuid" => key::UUID,
                "created_on" => key::CREATED_ON,
                "modified_on" => key::MODIFIED_ON,
                _ => continue,
            };

            encoded
                .data
                .insert(attribute.to_string(), field.format(value).to_json());
            continue;
        }

        let wire = match &field.ty {
            FieldType::Upload => {
                encoded.files.insert(name.to_string(), value.clone());
                continue;
            }
            FieldType::Reference(Some(fk)) => {
                encoded
                    .references
                    .insert(name.to_string(), (fk.table.clone(), value.clone()));
                continue;
            }
            FieldType::Boolean => {
                let text = if value.is_truthy() { "true" } else { "false" };
                json!({ (key::VALUE): text })
            }
            FieldType::Integer | FieldType::Double => json!({ (key::VALUE): value.to_text() }),
            FieldType::Date | FieldType::DateTime => field.format(value).to_json(),
            FieldType::String | FieldType::Text => value.to_json(),
            _ => {
                tracing::debug!(table = %table.name, field = name, ty = %field.ty, "type not exported");
                continue;
            }
        };

        encoded.data.insert(name.to_string(), wire);
    }

    encoded
}

/// Adds the foreign key of `field` to a wire item. Nothing is added
/// without a uuid.
pub fn add_reference(item: &mut Map<String, Json>, field: &str, table: &str, uuid: Option<&str>) {
    let Some(uuid) = uuid.filter(|uuid| !uuid.is_empty()) else {
        return;
    };

    item.insert(
        key::reference_key(field),
        json!({ (key::RESOURCE): table, (key::UUID): uuid }),
    );
}

/// Adds the attachment `field` to a wire item. Nothing is added without a
/// file name.
pub fn add_file(item: &mut Map<String, Json>, field: &str, file_name: Option<&str>) {
    let Some(file_name) = file_name.filter(|name| !name.is_empty()) else {
        return;
    };

    item.insert(field.to_string(), json!({ (key::FILENAME): file_name }));
}

/// Wraps the items of `table` into a payload.
pub fn encode(table: &str, items: impl IntoIterator<Item = Json>) -> Json {
    let mut payload = Map::new();
    payload.insert(key::table_key(table), Json::Array(items.into_iter().collect()));
    Json::Object(payload)
}
