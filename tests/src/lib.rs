pub use exec_log::ExecLog;

pub use logging_adapter::{AdapterOp, LoggingAdapter, Operation};

use outpost_core::{
    schema::{FieldDescription, FieldType, Settings},
    Db, Table,
};
use outpost_driver_sqlite::Sqlite;
use outpost_sql::Serializer;
use std::sync::Once;

/// Opens an in-memory database with the internal tables created. The
/// returned log starts out empty.
pub async fn setup() -> (Db, ExecLog) {
    init_tracing();

    let adapter = LoggingAdapter::new(Sqlite::in_memory().unwrap());
    let mut log = ExecLog::new(adapter.ops_log_handle());

    let db = Db::builder()
        .compiler(Serializer::sqlite())
        .connect(adapter)
        .unwrap();

    db.bootstrap().await.unwrap();
    log.clear();

    (db, log)
}

/// Installs a subscriber honouring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A user table with the meta-fields injected. Fields are given as
/// `(name, type tag)`.
pub fn table(name: &str, fields: &[(&str, &str)]) -> Table {
    table_with(name, fields, Settings::default())
}

pub fn table_with(name: &str, fields: &[(&str, &str)], settings: Settings) -> Table {
    let fields = fields
        .iter()
        .map(|(name, ty)| (name.to_string(), FieldDescription::new(FieldType::parse(ty))))
        .collect();

    Table::from_descriptions(name, fields, settings).unwrap()
}

/// Table settings from their JSON form.
pub fn settings(json: serde_json::Value) -> Settings {
    serde_json::from_value(json).unwrap()
}
