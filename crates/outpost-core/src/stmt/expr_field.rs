use super::Expr;

use std::fmt;

/// A qualified reference to a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExprField {
    pub table: String,
    pub name: String,
}

impl ExprField {
    pub fn new(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
        }
    }

    /// The `table.field` key under which the column is returned by a select.
    pub fn alias(&self) -> String {
        format!("{}.{}", self.table, self.name)
    }
}

impl fmt::Display for ExprField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.name)
    }
}

impl From<ExprField> for Expr {
    fn from(value: ExprField) -> Self {
        Expr::Field(value)
    }
}
