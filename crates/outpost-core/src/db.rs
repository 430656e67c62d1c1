mod builder;
pub use builder::Builder;

use crate::{
    driver::{Adapter, Compiler, Response, Statement},
    schema::{meta, ComponentRegistry, FieldDescription, Settings, Table, Tables},
    stmt::{Direction, SelectOptions, Value},
    Error, Result,
};

use indexmap::IndexMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

/// Shared state between all `Db` clones.
#[derive(Debug)]
struct Shared {
    adapter: Box<dyn Adapter>,
    compiler: Box<dyn Compiler>,

    /// Live tables by name
    tables: RwLock<Tables>,

    components: Mutex<ComponentRegistry>,

    /// Every storage failure is published here
    errors: broadcast::Sender<Error>,
}

/// Handle to an open database. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn compiler(&self) -> &dyn Compiler {
        &*self.shared.compiler
    }

    /// The registered table `name`.
    pub fn table(&self, name: &str) -> Option<Arc<Table>> {
        self.read_tables().get(name).cloned()
    }

    /// Snapshot of the registered tables.
    pub fn tables(&self) -> Tables {
        self.read_tables().clone()
    }

    /// Registers `table`, replacing any table of the same name.
    pub fn register(&self, table: Table) -> Arc<Table> {
        let table = Arc::new(table);
        self.write_tables().insert(table.name.clone(), table.clone());
        table
    }

    // Entries are whole `Arc<Table>` values; a poisoned registry is still
    // consistent.
    fn read_tables(&self) -> RwLockReadGuard<'_, Tables> {
        self.shared
            .tables
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_tables(&self) -> RwLockWriteGuard<'_, Tables> {
        self.shared
            .tables
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The component hooks of this database.
    pub fn components(&self) -> Result<MutexGuard<'_, ComponentRegistry>> {
        self.shared
            .components
            .lock()
            .map_err(|_| crate::err!("component registry poisoned"))
    }

    /// Receives every storage failure of this database, including failures
    /// whose caller handles the returned error.
    pub fn subscribe_errors(&self) -> broadcast::Receiver<Error> {
        self.shared.errors.subscribe()
    }

    pub async fn execute(&self, statement: Statement) -> Result<Response> {
        tracing::debug!(sql = %statement.sql, params = statement.params.len(), "execute");

        self.shared
            .adapter
            .execute(statement)
            .await
            .inspect_err(|err| self.sql_error(err))
    }

    /// Executes `statements` in order, as a unit.
    pub async fn batch(&self, statements: Vec<Statement>) -> Result<()> {
        tracing::debug!(statements = statements.len(), "batch");

        self.shared
            .adapter
            .batch(statements)
            .await
            .inspect_err(|err| self.sql_error(err))
    }

    fn sql_error(&self, err: &Error) {
        tracing::error!(error = %err, "storage operation failed");
        // No subscribers is fine
        let _ = self.shared.errors.send(err.clone());
    }

    /// Tables declaring themselves instances of `object_type`.
    pub fn instance_tables(&self, object_type: &str) -> Vec<Arc<Table>> {
        self.tables()
            .into_values()
            .filter(|table| table.object_types().any(|t| t == object_type))
            .collect()
    }

    /// Creates the schema and versioning tables unless they exist.
    pub async fn bootstrap(&self) -> Result<()> {
        if self.table(meta::SCHEMA_TABLE).is_none() {
            let mut schema = meta::schema_table()?;
            schema.add_meta_fields();
            schema.create(self, vec![]).await?;
        }

        if self.table(meta::VERSION_TABLE).is_none() {
            let mut version = meta::version_table()?;
            version.add_meta_fields();
            version.create(self, vec![]).await?;
        }

        Ok(())
    }

    /// Rebuilds the user tables persisted in the schema table and registers
    /// their components. Resolves to the loaded tables.
    ///
    /// When a table was saved more than once, the latest entry wins.
    pub async fn load_schema(&self) -> Result<Vec<Arc<Table>>> {
        let schema = self
            .table(meta::SCHEMA_TABLE)
            .ok_or_else(|| Error::table_not_found(meta::SCHEMA_TABLE))?;

        let options = SelectOptions::default().order_by(schema.column(meta::IDENTITY)?, Direction::Asc);
        let rows = schema.select(self, vec![], options).await?;

        let mut entries = IndexMap::new();
        for row in rows {
            let data = row.into_data(&schema.name);
            let Some(name) = data.get("name").and_then(Value::as_str) else {
                continue;
            };
            if meta::is_system_table(name) {
                continue;
            }
            entries.insert(name.to_string(), data);
        }

        let mut loaded = Vec::with_capacity(entries.len());
        for (name, data) in entries {
            let descriptions: IndexMap<String, FieldDescription> =
                from_json(data.get("fields")).map_err(|err| {
                    err.context(Error::invalid_schema(format!("fields of `{name}`")))
                })?;
            let settings: Settings = from_json(data.get("settings")).map_err(|err| {
                err.context(Error::invalid_schema(format!("settings of `{name}`")))
            })?;

            let table = Table::from_descriptions(name, descriptions, settings)?;
            loaded.push(self.register(table));
        }

        let mut components = self.components()?;
        for table in &loaded {
            for (alias, description) in &table.settings.components {
                components.add_component(table, alias, description);
            }
        }
        drop(components);

        tracing::debug!(tables = loaded.len(), "schema loaded");
        Ok(loaded)
    }

    /// Drops every user table from the registry, resets the component hooks
    /// and loads the schema again.
    pub async fn reload_schema(&self) -> Result<Vec<Arc<Table>>> {
        self.write_tables().retain(|name, _| meta::is_system_table(name));

        self.components()?.reset();

        self.load_schema().await
    }

    /// Drops the storage of table `name`, unregisters it and removes its
    /// component hooks.
    pub async fn drop_table(&self, name: &str) -> Result<()> {
        let table = self
            .table(name)
            .ok_or_else(|| Error::table_not_found(name))?;

        self.execute(self.compiler().drop_table(&table)).await?;

        let tables = {
            let mut tables = self.write_tables();
            tables.shift_remove(name);
            tables.clone()
        };

        self.components()?.remove_hooks(&table, &tables);
        Ok(())
    }
}

/// Reads a JSON column, which comes back as text when storage could not
/// load it as a document.
fn from_json<T: serde::de::DeserializeOwned + Default>(value: Option<&Value>) -> Result<T> {
    match value {
        None | Some(Value::Null) => Ok(T::default()),
        Some(Value::Text(text)) => Ok(serde_json::from_str(text)?),
        Some(value) => Ok(serde_json::from_value(value.to_json())?),
    }
}
