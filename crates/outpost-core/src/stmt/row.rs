use super::{Data, ExprField, Value};
use crate::Field;

use indexmap::IndexMap;

/// A row returned by a select, keyed by `table.field`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Row {
    columns: IndexMap<String, Value>,
}

impl Row {
    pub fn new(columns: IndexMap<String, Value>) -> Self {
        Self { columns }
    }

    /// Value of the column selected under `alias` (`table.field`).
    pub fn get(&self, alias: &str) -> Option<&Value> {
        self.columns.get(alias)
    }

    pub fn column(&self, column: &ExprField) -> Option<&Value> {
        self.columns.get(&column.alias())
    }

    /// Value of `field`, if it was selected.
    pub fn field(&self, field: &Field) -> Option<&Value> {
        self.columns.get(&field.expr().alias())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.columns.iter().map(|(alias, value)| (alias.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The columns belonging to `table`, keyed by bare field name.
    pub fn into_data(self, table: &str) -> Data {
        self.columns
            .into_iter()
            .filter_map(|(alias, value)| {
                let (prefix, name) = alias.split_once('.')?;
                (prefix == table).then(|| (name.to_string(), value))
            })
            .collect()
    }
}
