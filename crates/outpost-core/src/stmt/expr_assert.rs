use super::Expr;

use std::fmt;

/// A boolean SQL assertion, e.g. `person.age > 18`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprAssert {
    sql: String,
}

impl ExprAssert {
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Combines two assertions, both of which must hold.
    pub fn and(self, other: ExprAssert) -> ExprAssert {
        ExprAssert::new(format!("({}) AND ({})", self.sql, other.sql))
    }
}

impl fmt::Display for ExprAssert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl From<ExprAssert> for Expr {
    fn from(value: ExprAssert) -> Self {
        Expr::Assert(value)
    }
}
