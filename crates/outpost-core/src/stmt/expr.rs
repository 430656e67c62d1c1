use super::{ExprAssert, ExprField, ExprJoin};

use std::fmt;

/// A SQL fragment.
///
/// The variant set is closed: a reference to a field, a raw boolean
/// assertion usable in WHERE and ON clauses, or a join of a table on an
/// assertion.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// References a field of a table, rendered as `table.field`
    Field(ExprField),

    /// A boolean assertion given as raw SQL text
    Assert(ExprAssert),

    /// Joins a table on an assertion
    Join(ExprJoin),
}

/// Discriminant of an [`Expr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprType {
    Field,
    Assert,
    Join,
}

impl Expr {
    pub fn expr_type(&self) -> ExprType {
        match self {
            Self::Field(_) => ExprType::Field,
            Self::Assert(_) => ExprType::Assert,
            Self::Join(_) => ExprType::Join,
        }
    }

    pub fn is_assert(&self) -> bool {
        matches!(self, Self::Assert(_))
    }

    pub fn as_assert(&self) -> Option<&ExprAssert> {
        match self {
            Self::Assert(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn into_assert(self) -> Option<ExprAssert> {
        match self {
            Self::Assert(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(expr) => fmt::Display::fmt(expr, f),
            Self::Assert(expr) => fmt::Display::fmt(expr, f),
            Self::Join(expr) => fmt::Display::fmt(expr, f),
        }
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Field => "field",
            Self::Assert => "assert",
            Self::Join => "join",
        })
    }
}
