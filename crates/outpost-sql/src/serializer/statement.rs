use super::{
    column::{ColumnAlias, ColumnDef},
    Comma, Formatter, Ident, Params, ToSql,
};

use outpost_core::{
    stmt::{Data, Direction, ExprAssert, ExprField, JoinKind, SelectOptions, Set, Value},
    Table,
};

pub(super) struct DropTable<'a>(pub(super) &'a Table);

pub(super) struct CreateTable<'a>(pub(super) &'a Table);

pub(super) struct Insert<'a> {
    pub(super) table: &'a Table,
    pub(super) data: &'a Data,
}

pub(super) struct Update<'a> {
    pub(super) table: &'a Table,
    pub(super) data: &'a Data,
    pub(super) filter: Option<&'a ExprAssert>,
}

pub(super) struct Count<'a> {
    pub(super) table: &'a Table,
    pub(super) filter: Option<&'a ExprAssert>,
}

pub(super) struct Select<'a> {
    pub(super) set: &'a Set<'a>,
    pub(super) columns: &'a [ExprField],
    pub(super) options: &'a SelectOptions,
}

struct Where<'a>(Option<&'a ExprAssert>);

struct Assignment<'a>(&'a str, &'a Value);

impl ToSql for DropTable<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "DROP TABLE IF EXISTS " Ident(&self.0.name));
    }
}

impl ToSql for CreateTable<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let columns = Comma(self.0.fields().map(ColumnDef));
        fmt!(f, "CREATE TABLE IF NOT EXISTS " Ident(&self.0.name) " (" columns ")");
    }
}

impl ToSql for Insert<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let values = self
            .data
            .iter()
            .filter(|(name, _)| self.table.has_field(name))
            .collect::<Vec<_>>();

        if values.is_empty() {
            fmt!(f, "INSERT INTO " Ident(&self.table.name) " DEFAULT VALUES");
            return;
        }

        let names = Comma(values.iter().map(|(name, _)| Ident(*name)));
        let params = Comma(values.iter().map(|(_, value)| *value));

        fmt!(f, "INSERT INTO " Ident(&self.table.name) " (" names ") VALUES (" params ")");
    }
}

impl ToSql for Update<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let assignments = Comma(
            self.data
                .iter()
                .filter(|(name, _)| self.table.has_field(name))
                .map(|(name, value)| Assignment(name, value)),
        );

        fmt!(f, "UPDATE " Ident(&self.table.name) " SET " assignments Where(self.filter));
    }
}

impl ToSql for Count<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(
            f,
            "SELECT COUNT(*) AS " Ident("number") " FROM " Ident(&self.table.name) Where(self.filter)
        );
    }
}

impl ToSql for Select<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let distinct = if self.options.distinct { "DISTINCT " } else { "" };
        let columns = Comma(self.columns.iter().map(ColumnAlias));

        fmt!(f, "SELECT " distinct columns " FROM " Ident(&self.set.table().name));

        for join in self.set.joins() {
            let kind = match join.kind {
                JoinKind::Inner => " INNER JOIN ",
                JoinKind::Left => " LEFT JOIN ",
            };
            fmt!(f, kind Ident(&join.expr.table) " ON " join.expr.on.sql());
        }

        fmt!(f, Where(self.set.condition()));

        if !self.options.order_by.is_empty() {
            let order_by = Comma(self.options.order_by.iter().map(|order_by| {
                let direction = match order_by.direction {
                    Direction::Asc => " ASC",
                    Direction::Desc => " DESC",
                };
                OrderBy(&order_by.column, direction)
            }));
            fmt!(f, " ORDER BY " order_by);
        }

        match (self.options.limit, self.options.offset) {
            (Some(limit), offset) => {
                fmt!(f, " LIMIT " limit offset.map(Offset));
            }
            // SQLite only accepts OFFSET after LIMIT
            (None, Some(offset)) => {
                fmt!(f, " LIMIT -1" Offset(offset));
            }
            (None, None) => {}
        }
    }
}

struct OrderBy<'a>(&'a ExprField, &'static str);

struct Offset(u64);

impl ToSql for OrderBy<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, self.0 self.1);
    }
}

impl ToSql for Offset {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, " OFFSET " self.0);
    }
}

impl ToSql for Where<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if let Some(filter) = self.0 {
            fmt!(f, " WHERE " filter.sql());
        }
    }
}

impl ToSql for Assignment<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(self.0) " = " self.1);
    }
}
