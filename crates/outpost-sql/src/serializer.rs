#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::Comma;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod column;
mod statement;
mod ty;

use outpost_core::{
    driver::{Compiler, Statement},
    stmt::{Data, ExprAssert, ExprField, SelectOptions, Set, Value},
    Table,
};

/// Serializes table statements to SQLite SQL.
///
/// Values are always bound as parameters (`?1`, `?2`, ...). WHERE and ON
/// conditions are written verbatim from their assertions.
#[derive(Debug, Default, Clone)]
pub struct Serializer {
    _p: (),
}

struct Formatter<'a, T> {
    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl Serializer {
    pub fn sqlite() -> Serializer {
        Serializer::default()
    }

    fn serialize(&self, stmt: impl ToSql) -> Statement {
        let mut sql = String::new();
        let mut params = Vec::<Value>::new();

        let mut fmt = Formatter {
            dst: &mut sql,
            params: &mut params,
        };

        stmt.to_sql(&mut fmt);

        sql.push(';');
        Statement::new(sql, params)
    }
}

impl Compiler for Serializer {
    fn drop_table(&self, table: &Table) -> Statement {
        self.serialize(statement::DropTable(table))
    }

    fn create_table(&self, table: &Table) -> Statement {
        self.serialize(statement::CreateTable(table))
    }

    fn insert(&self, table: &Table, data: &Data) -> Statement {
        self.serialize(statement::Insert { table, data })
    }

    fn update(&self, table: &Table, data: &Data, filter: Option<&ExprAssert>) -> Statement {
        self.serialize(statement::Update {
            table,
            data,
            filter,
        })
    }

    fn count(&self, table: &Table, filter: Option<&ExprAssert>) -> Statement {
        self.serialize(statement::Count { table, filter })
    }

    fn select(&self, set: &Set<'_>, columns: &[ExprField], options: &SelectOptions) -> Statement {
        self.serialize(statement::Select {
            set,
            columns,
            options,
        })
    }
}
