use super::{ExprAssert, ExprField, ExprJoin, Row, SelectOptions};
use crate::{Db, Field, Result, Table};

use indexmap::IndexMap;

/// A query over a base table, with optional joins and an optional filter.
///
/// Sets are built fresh for each query. Every builder method consumes the
/// set and returns the extended one, and [`Set::select`] consumes it for
/// good, so a set can never change once it has been executed.
///
/// ```ignore
/// let rows = person
///     .join(office.on(office.sql_assert("office.id = person.office_id"))?)
///     .filter(person.field("name").unwrap().equals("Jane"))
///     .select(&db, vec![], SelectOptions::default())
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Set<'a> {
    table: &'a Table,
    joins: Vec<Join>,
    filter: Option<ExprAssert>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub expr: ExprJoin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl<'a> Set<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            joins: vec![],
            filter: None,
        }
    }

    /// The base table
    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// The WHERE assertion, if any
    pub fn condition(&self) -> Option<&ExprAssert> {
        self.filter.as_ref()
    }

    /// Restricts the set. Filtering an already filtered set requires both
    /// assertions to hold.
    pub fn filter(mut self, expr: ExprAssert) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// Adds an inner join.
    pub fn join(mut self, expr: ExprJoin) -> Self {
        self.joins.push(Join {
            kind: JoinKind::Inner,
            expr,
        });
        self
    }

    /// Adds a left join.
    pub fn left(mut self, expr: ExprJoin) -> Self {
        self.joins.push(Join {
            kind: JoinKind::Left,
            expr,
        });
        self
    }

    /// Selects `columns` from the set; an empty list selects every field of
    /// the base table.
    ///
    /// Values come back converted to the declared type of their field.
    pub async fn select(
        self,
        db: &Db,
        columns: Vec<ExprField>,
        options: SelectOptions,
    ) -> Result<Vec<Row>> {
        let columns = if columns.is_empty() {
            self.table.fields().map(Field::expr).collect()
        } else {
            columns
        };

        let loaders = columns
            .iter()
            .map(|column| self.resolve(db, column))
            .collect::<Vec<_>>();

        let statement = db.compiler().select(&self, &columns, &options);
        let response = db.execute(statement).await?;

        let rows = response
            .rows
            .into_iter()
            .map(|mut raw| {
                let mut row = IndexMap::with_capacity(columns.len());
                for (column, loader) in columns.iter().zip(&loaders) {
                    let alias = column.alias();
                    let value = raw.shift_remove(&alias).unwrap_or_default();
                    let value = match loader {
                        Some(field) => field.load(value),
                        None => value,
                    };
                    row.insert(alias, value);
                }
                Row::new(row)
            })
            .collect();

        Ok(rows)
    }

    fn resolve(&self, db: &Db, column: &ExprField) -> Option<Field> {
        if column.table == self.table.name {
            self.table.field(&column.name).cloned()
        } else {
            db.table(&column.table)
                .and_then(|table| table.field(&column.name).cloned())
        }
    }
}
