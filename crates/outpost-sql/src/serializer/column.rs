use super::{Formatter, Ident, Params, ToSql};

use outpost_core::{schema::Field, stmt::ExprField};

/// `"table"."field"`
impl ToSql for &ExprField {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, Ident(&self.table) "." Ident(&self.name));
    }
}

/// A projected column, returned under its `table.field` alias.
pub(super) struct ColumnAlias<'a>(pub(super) &'a ExprField);

impl ToSql for ColumnAlias<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, self.0 " AS " Ident(self.0.alias()));
    }
}

/// Column definition for CREATE TABLE.
pub(super) struct ColumnDef<'a>(pub(super) &'a Field);

impl ToSql for ColumnDef<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let ty = &self.0.ty;
        fmt!(f, Ident(&self.0.name) " " ty);
    }
}
