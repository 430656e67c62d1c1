use super::Statement;
use crate::{
    stmt::{Data, ExprAssert, ExprField, SelectOptions, Set},
    Table,
};

use std::fmt::Debug;

/// Produces the statements for a table.
///
/// Tables and sets never write SQL beyond identifiers and the WHERE
/// fragments carried by expressions; everything else comes from here.
pub trait Compiler: Debug + Send + Sync + 'static {
    fn drop_table(&self, table: &Table) -> Statement;

    fn create_table(&self, table: &Table) -> Statement;

    /// Inserts one record. Values for names the table does not have are
    /// ignored.
    fn insert(&self, table: &Table, data: &Data) -> Statement;

    /// Updates all rows, or only those matching `filter`.
    fn update(&self, table: &Table, data: &Data, filter: Option<&ExprAssert>) -> Statement;

    /// Counts rows into a single column named `number`.
    fn count(&self, table: &Table, filter: Option<&ExprAssert>) -> Statement;

    /// Projects `columns` from `set`. Each column is returned under its
    /// `table.field` alias.
    fn select(&self, set: &Set<'_>, columns: &[ExprField], options: &SelectOptions) -> Statement;
}
