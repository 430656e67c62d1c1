use super::{Formatter, Params, ToSql};

use outpost_core::schema::FieldType;

/// Storage type of a column.
impl ToSql for &FieldType {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(
            f,
            match self {
                FieldType::Id => "INTEGER PRIMARY KEY AUTOINCREMENT",
                FieldType::Boolean | FieldType::Integer | FieldType::Reference(_) => "INTEGER",
                FieldType::Double => "REAL",
                FieldType::String
                | FieldType::Text
                | FieldType::Date
                | FieldType::DateTime
                | FieldType::Json
                | FieldType::Upload
                | FieldType::Other(_) => "TEXT",
            }
        );
    }
}
