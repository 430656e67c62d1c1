use super::{meta, ComponentDescription, Field, FieldDescription, FieldType};
use crate::{
    stmt::{Data, Expr, ExprAssert, ExprField, ExprJoin, JoinOp, Row, SelectOptions, Set, Value},
    Db, Error, Result,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

/// A table of the server-defined schema.
///
/// Storage operations take the [`Db`] they run against.
#[derive(Debug, Clone)]
pub struct Table {
    /// Name of the table
    pub name: String,

    /// Fields by name, in declaration order
    fields: IndexMap<String, Field>,

    pub settings: Settings,
}

/// Table settings as received from the server.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Object types this table is an instance of, mapped to the key field
    /// that identifies the table's records as objects of that type
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub types: IndexMap<String, String>,

    /// Component descriptions by alias
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub components: IndexMap<String, ComponentDescription>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Table {
    /// Creates a table owning `fields`.
    ///
    /// Meta-fields are not added; see [`Table::add_meta_fields`].
    pub fn new(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = Field>,
        settings: Settings,
    ) -> Result<Table> {
        let mut table = Table {
            name: name.into(),
            fields: IndexMap::new(),
            settings,
        };

        for field in fields {
            table.add_field(field)?;
        }

        Ok(table)
    }

    /// Builds a table from its serialized field descriptions and adds the
    /// meta-fields.
    pub fn from_descriptions(
        name: impl Into<String>,
        descriptions: IndexMap<String, FieldDescription>,
        settings: Settings,
    ) -> Result<Table> {
        let fields = descriptions
            .into_iter()
            .map(|(name, description)| Field::new(name, description));

        let mut table = Table::new(name, fields, settings)?;
        table.add_meta_fields();
        Ok(table)
    }

    fn add_field(&mut self, mut field: Field) -> Result<()> {
        if self.fields.contains_key(&field.name) {
            return Err(Error::invalid_schema(format!(
                "duplicate field `{}` in table `{}`",
                field.name, self.name
            )));
        }

        field.attach(&self.name);
        self.fields.insert(field.name.clone(), field);
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.values()
    }

    /// Reference to the field `name`, failing if the table has no such field.
    pub fn column(&self, name: &str) -> Result<ExprField> {
        self.field(name).map(Field::expr).ok_or_else(|| {
            Error::invalid_expression(format!("table `{}` has no field `{name}`", self.name))
        })
    }

    /// Injects the identity field and, for user tables, the shared
    /// meta-fields. Fields already present are kept.
    pub fn add_meta_fields(&mut self) {
        let mut fields = vec![];

        if self.name != meta::VERSION_TABLE {
            fields.push(meta::identity_field());
        }

        if self.is_user_table() {
            fields.extend(meta::meta_fields());
        }

        for mut field in fields {
            if !self.fields.contains_key(&field.name) {
                field.attach(&self.name);
                self.fields.insert(field.name.clone(), field);
            }
        }
    }

    /// True unless the name carries the reserved prefix.
    pub fn is_user_table(&self) -> bool {
        !meta::is_system_table(&self.name)
    }

    /// The object type for which `key` identifies this table's records.
    pub fn object_type(&self, key: &str) -> Option<&str> {
        self.settings
            .types
            .iter()
            .find(|(_, k)| *k == key)
            .map(|(object_type, _)| object_type.as_str())
    }

    /// Object types this table is an instance of.
    pub fn object_types(&self) -> impl Iterator<Item = &str> + '_ {
        self.settings.types.keys().map(String::as_str)
    }

    pub fn to_sql(&self) -> &str {
        &self.name
    }

    /// Wraps raw SQL text as an assertion.
    pub fn sql_assert(&self, sql: impl Into<String>) -> ExprAssert {
        ExprAssert::new(sql)
    }

    /// Joins this table on `expr`, which must be an assertion.
    pub fn on(&self, expr: impl Into<Expr>) -> Result<ExprJoin> {
        let expr = expr.into();
        let expr_type = expr.expr_type();

        let Some(on) = expr.into_assert() else {
            return Err(Error::invalid_expression(format!(
                "join condition must be an assertion, got {expr_type}"
            )));
        };

        Ok(ExprJoin {
            table: self.name.clone(),
            op: JoinOp::On,
            on,
        })
    }

    pub fn filter(&self, expr: ExprAssert) -> Set<'_> {
        Set::new(self).filter(expr)
    }

    pub fn join(&self, expr: ExprJoin) -> Set<'_> {
        Set::new(self).join(expr)
    }

    pub fn left(&self, expr: ExprJoin) -> Set<'_> {
        Set::new(self).left(expr)
    }

    /// (Re)creates the table in storage, registers it with `db`, persists
    /// its schema and inserts `records`.
    ///
    /// Creating the schema table persists the schema of every registered
    /// table.
    pub async fn create(self, db: &Db, records: Vec<Data>) -> Result<Arc<Table>> {
        let compiler = db.compiler();
        db.batch(vec![compiler.drop_table(&self), compiler.create_table(&self)])
            .await?;

        let table = db.register(self);

        if table.name == meta::SCHEMA_TABLE {
            for registered in db.tables().values() {
                registered.save_schema(db).await?;
            }
        } else {
            table.save_schema(db).await?;
        }

        table.populate(db, records).await?;

        tracing::debug!(table = %table.name, "table created");
        Ok(table)
    }

    /// Inserts `records` in one batch. Nothing is submitted when there are
    /// no records.
    pub async fn populate(&self, db: &Db, records: Vec<Data>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let compiler = db.compiler();
        let statements = records
            .iter()
            .map(|record| compiler.insert(self, &self.add_defaults(record, false, false)))
            .collect();

        db.batch(statements).await
    }

    /// Persists the description of every non-meta field and the settings to
    /// the schema table. Does nothing until the schema table exists.
    pub async fn save_schema(&self, db: &Db) -> Result<()> {
        let Some(schema) = db.table(meta::SCHEMA_TABLE) else {
            return Ok(());
        };

        let mut fields = serde_json::Map::new();
        for field in self.fields().filter(|field| !field.meta) {
            fields.insert(
                field.name.clone(),
                serde_json::to_value(field.description())?,
            );
        }

        let settings = serde_json::to_value(&self.settings)?;

        let record = Data::new()
            .with("name", self.name.as_str())
            .with("fields", Value::Json(serde_json::Value::Object(fields)))
            .with("settings", Value::Json(settings));

        schema.insert(db, record).await?;
        Ok(())
    }

    /// Adds defaults for every field absent from `data`.
    ///
    /// With `is_update` the update values are used instead of the defaults.
    /// With `visible_only` fields that are not readable are skipped. Values
    /// present in `data` are never replaced.
    pub fn add_defaults(&self, data: &Data, visible_only: bool, is_update: bool) -> Data {
        let mut record = Data::new();

        for field in self.fields() {
            if data.contains(&field.name) || (visible_only && !field.readable) {
                continue;
            }

            let default = if is_update {
                &field.update_value
            } else {
                &field.default_value
            };

            if let Some(default) = default {
                record.insert(field.name.clone(), default.resolve());
            }
        }

        record.extend(data.clone());
        record
    }

    /// Inserts a record, adding defaults first. Resolves to the identity of
    /// the new row.
    pub async fn insert(&self, db: &Db, data: Data) -> Result<i64> {
        let record = self.add_defaults(&data, false, false);
        let statement = db.compiler().insert(self, &record);

        let response = db.execute(statement).await?;
        response
            .insert_id
            .ok_or_else(|| crate::err!("insert into `{}` returned no row identity", self.name))
    }

    /// Updates every row, or the rows matching `filter`. Update values are
    /// added unless `data` is marked with [`Data::skip_defaults`]. Resolves
    /// to the number of rows affected.
    pub async fn update(&self, db: &Db, data: Data, filter: Option<ExprAssert>) -> Result<u64> {
        let record = if data.is_skip_defaults() {
            data
        } else {
            self.add_defaults(&data, false, true)
        };

        if !record.names().any(|name| self.has_field(name)) {
            return Ok(0);
        }

        let statement = db.compiler().update(self, &record, filter.as_ref());
        Ok(db.execute(statement).await?.rows_affected)
    }

    /// Selects from this table; see [`Set::select`].
    pub async fn select(
        &self,
        db: &Db,
        columns: Vec<ExprField>,
        options: SelectOptions,
    ) -> Result<Vec<Row>> {
        Set::new(self).select(db, columns, options).await
    }

    /// Every non-empty upload value across the matching rows.
    pub async fn files(&self, db: &Db, filter: Option<ExprAssert>) -> Result<Vec<String>> {
        let uploads = self
            .fields()
            .filter(|field| field.ty.is_upload())
            .collect::<Vec<_>>();

        if uploads.is_empty() {
            return Ok(vec![]);
        }

        let mut set = Set::new(self);
        if let Some(filter) = filter {
            set = set.filter(filter);
        }

        let columns = uploads.iter().map(|field| field.expr()).collect();
        let rows = set.select(db, columns, SelectOptions::default()).await?;

        let mut files = vec![];
        for row in &rows {
            for field in &uploads {
                if let Some(value) = row.field(field).filter(|value| value.is_truthy()) {
                    files.push(value.to_text());
                }
            }
        }

        Ok(files)
    }

    /// Looks up the local row for a record fragment by its uuid.
    ///
    /// Resolves to the identity, the sync timestamps and the upload fields
    /// of the row, or `None` if the fragment has no uuid, the table has no
    /// uuid field or no row matches.
    pub async fn identify(&self, db: &Db, fragment: &Data) -> Result<Option<Data>> {
        let Some(uuid) = fragment.get("uuid").filter(|uuid| uuid.is_truthy()) else {
            return Ok(None);
        };
        let Some(uuid_field) = self.field("uuid") else {
            return Ok(None);
        };

        let columns = self
            .fields()
            .filter(|field| {
                matches!(
                    field.name.as_str(),
                    meta::IDENTITY | "synchronized_on" | "modified_on"
                ) || field.ty == FieldType::Upload
            })
            .map(Field::expr)
            .collect();

        let rows = self
            .filter(uuid_field.equals(uuid.clone()))
            .select(db, columns, SelectOptions::default().limit(1))
            .await?;

        Ok(rows.into_iter().next().map(|row| row.into_data(&self.name)))
    }

    /// Number of rows, optionally filtered.
    pub async fn count(&self, db: &Db, filter: Option<ExprAssert>) -> Result<u64> {
        let statement = db.compiler().count(self, filter.as_ref());
        let response = db.execute(statement).await?;

        let number = response
            .rows
            .first()
            .and_then(|row| row.get("number"))
            .and_then(Value::as_i64)
            .ok_or_else(|| crate::err!("count on `{}` returned no number", self.name))?;

        Ok(number.max(0) as u64)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
