use outpost_core::{schema::meta, Db};
use outpost_driver_sqlite::Sqlite;
use outpost_sql::Serializer;
use tests::{setup, table};

#[tokio::test]
async fn internal_tables() {
    let (db, mut log) = setup().await;

    let schema = db.table(meta::SCHEMA_TABLE).unwrap();
    let version = db.table(meta::VERSION_TABLE).unwrap();

    assert!(schema.has_field(meta::IDENTITY));
    assert!(!version.has_field(meta::IDENTITY));
    assert!(!schema.has_field("uuid"));

    // Both internal tables are persisted in the schema table
    assert_eq!(schema.count(&db, None).await.unwrap(), 2);

    log.clear();
    db.bootstrap().await.unwrap();
    assert!(log.is_empty());
}

#[tokio::test]
async fn internal_tables_are_not_loaded_as_user_tables() {
    let (db, _log) = setup().await;

    assert!(db.load_schema().await.unwrap().is_empty());
    assert!(db.table(meta::SCHEMA_TABLE).is_some());
}

#[tokio::test]
async fn load_schema_requires_bootstrap() {
    let db = Db::builder()
        .compiler(Serializer::sqlite())
        .connect(Sqlite::in_memory().unwrap())
        .unwrap();

    let err = db.load_schema().await.unwrap_err();
    assert!(err.is_table_not_found());
    assert_eq!(err.to_string(), "table not found: em_schema");
}

#[tokio::test]
async fn bootstrap_persists_tables_created_before_it() {
    let db = Db::builder()
        .compiler(Serializer::sqlite())
        .connect(Sqlite::in_memory().unwrap())
        .unwrap();

    table("office", &[("name", "string")])
        .create(&db, vec![])
        .await
        .unwrap();
    db.bootstrap().await.unwrap();

    let schema = db.table(meta::SCHEMA_TABLE).unwrap();
    assert_eq!(schema.count(&db, None).await.unwrap(), 3);

    let loaded = db.load_schema().await.unwrap();
    let names = loaded.iter().map(|table| table.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["office"]);
    assert!(db.table("office").unwrap().has_field("name"));
}

#[test]
fn connect_requires_compiler() {
    let err = Db::builder()
        .connect(Sqlite::in_memory().unwrap())
        .unwrap_err();

    assert_eq!(err.to_string(), "no statement compiler configured");
}
