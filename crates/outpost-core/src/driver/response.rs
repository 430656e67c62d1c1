use crate::stmt::Value;

use indexmap::IndexMap;

/// Result of executing a statement.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Response {
    /// Returned rows, keyed by column name
    pub rows: Vec<IndexMap<String, Value>>,

    /// Number of rows impacted by an insert, update or delete
    pub rows_affected: u64,

    /// Row identity assigned by an insert
    pub insert_id: Option<i64>,
}

impl Response {
    pub fn rows(rows: Vec<IndexMap<String, Value>>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn count(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            ..Self::default()
        }
    }

    pub fn inserted(rows_affected: u64, insert_id: i64) -> Self {
        Self {
            rows_affected,
            insert_id: Some(insert_id),
            ..Self::default()
        }
    }
}
