mod value;
pub(crate) use value::Value;

use outpost_core::{
    async_trait,
    driver::{Adapter, Response, Statement},
    Error, Result,
};
use rusqlite::{params_from_iter, Connection};
use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};
use url::Url;

/// Storage adapter over a single SQLite connection.
///
/// Statements are serialized through the connection lock.
#[derive(Debug)]
pub struct Sqlite {
    connection: Mutex<Connection>,
}

impl Sqlite {
    /// Opens a database from a connection URL: `sqlite::memory:` or
    /// `sqlite:<path>`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver_operation_failed)?;

        if url.scheme() != "sqlite" {
            return Err(outpost_core::err!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            ));
        }

        if url.path() == ":memory:" {
            Self::in_memory()
        } else {
            Self::open(url.path())
        }
    }

    /// Creates an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(Error::driver_operation_failed)?;
        tracing::debug!("opened in-memory sqlite database");
        Ok(Self::from_connection(connection))
    }

    /// Opens the database file at `path`, creating it if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(&path).map_err(Error::driver_operation_failed)?;
        tracing::debug!(path = %path.as_ref().display(), "opened sqlite database");
        Ok(Self::from_connection(connection))
    }

    fn from_connection(connection: Connection) -> Self {
        Self {
            connection: Mutex::new(connection),
        }
    }

    fn execute_sync(&self, statement: &Statement) -> rusqlite::Result<Response> {
        let connection = self.connection_guard();
        let mut stmt = connection.prepare_cached(&statement.sql)?;

        let params = statement
            .params
            .iter()
            .cloned()
            .map(Value::from)
            .collect::<Vec<_>>();

        if stmt.column_count() == 0 {
            let rows_affected = stmt.execute(params_from_iter(params.iter()))? as u64;

            if is_insert(&statement.sql) {
                return Ok(Response::inserted(
                    rows_affected,
                    connection.last_insert_rowid(),
                ));
            }

            return Ok(Response::count(rows_affected));
        }

        let columns = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut ret = vec![];

        while let Some(row) = rows.next()? {
            let mut record = indexmap::IndexMap::with_capacity(columns.len());
            for (index, column) in columns.iter().enumerate() {
                record.insert(column.clone(), Value::from_sql(row, index)?.into_inner());
            }
            ret.push(record);
        }

        Ok(Response::rows(ret))
    }

    fn batch_sync(&self, statements: &[Statement]) -> rusqlite::Result<()> {
        let mut connection = self.connection_guard();
        let transaction = connection.transaction()?;

        for statement in statements {
            let params = statement
                .params
                .iter()
                .cloned()
                .map(Value::from)
                .collect::<Vec<_>>();
            transaction.execute(&statement.sql, params_from_iter(params.iter()))?;
        }

        transaction.commit()
    }

    fn connection_guard(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock leaves the connection usable
        self.connection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Adapter for Sqlite {
    async fn execute(&self, statement: Statement) -> Result<Response> {
        self.execute_sync(&statement)
            .map_err(Error::driver_operation_failed)
    }

    async fn batch(&self, statements: Vec<Statement>) -> Result<()> {
        self.batch_sync(&statements)
            .map_err(Error::driver_operation_failed)
    }
}

fn is_insert(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|keyword| keyword.eq_ignore_ascii_case("insert"))
}
