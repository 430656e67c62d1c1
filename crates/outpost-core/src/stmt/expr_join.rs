use super::{Expr, ExprAssert};

use std::fmt;

/// A table joined on an assertion. Built with
/// [`Table::on`](crate::Table::on).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprJoin {
    /// The table to join
    pub table: String,

    pub op: JoinOp,

    /// The join condition
    pub on: ExprAssert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOp {
    On,
}

impl fmt::Display for ExprJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ON {}", self.table, self.on)
    }
}

impl From<ExprJoin> for Expr {
    fn from(value: ExprJoin) -> Self {
        Expr::Join(value)
    }
}
