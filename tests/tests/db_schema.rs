use outpost_core::{
    schema::{meta, FieldType, Hook},
    stmt::Data,
};
use tests::{settings, setup, table, table_with};

use pretty_assertions::assert_eq;

#[tokio::test]
async fn reload_rebuilds_tables_and_components() {
    let (db, _log) = setup().await;

    table_with(
        "organisation",
        &[("name", "string")],
        settings(serde_json::json!({
            "components": {
                "offices": { "table": "office", "joinby": "organisation" },
            },
        })),
    )
    .create(&db, vec![])
    .await
    .unwrap();
    table(
        "office",
        &[("name", "string"), ("organisation", "reference organisation")],
    )
    .create(&db, vec![])
    .await
    .unwrap();

    assert!(db.components().unwrap().is_empty());

    let loaded = db.reload_schema().await.unwrap();
    let names = loaded.iter().map(|table| table.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["organisation", "office"]);

    let office = db.table("office").unwrap();
    assert_eq!(
        office.fields().map(|field| field.name.as_str()).collect::<Vec<_>>(),
        [
            "name",
            "organisation",
            "id",
            "uuid",
            "created_on",
            "modified_on",
            "synchronized_on"
        ]
    );
    assert_eq!(
        office.field("organisation").unwrap().ty,
        FieldType::parse("reference organisation")
    );

    let organisation = db.table("organisation").unwrap();
    let components = db.components().unwrap();
    assert_eq!(
        components.component(&organisation, "offices"),
        Some(Hook {
            table: "office".to_string(),
            pkey: "id".to_string(),
            fkey: Some("organisation".to_string()),
            multiple: true,
            link: None,
        })
    );
    assert!(components.has_parent("office"));
}

#[tokio::test]
async fn latest_schema_entry_wins() {
    let (db, _log) = setup().await;

    table("office", &[("name", "string")])
        .create(&db, vec![])
        .await
        .unwrap();
    table("office", &[("name", "string"), ("staff", "integer")])
        .create(&db, vec![])
        .await
        .unwrap();

    let loaded = db.reload_schema().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(db.table("office").unwrap().has_field("staff"));
}

#[tokio::test]
async fn reload_keeps_internal_tables() {
    let (db, _log) = setup().await;

    db.reload_schema().await.unwrap();

    assert!(db.table(meta::SCHEMA_TABLE).is_some());
    assert!(db.table(meta::VERSION_TABLE).is_some());
}

#[tokio::test]
async fn malformed_schema_entry() {
    let (db, _log) = setup().await;
    let schema = db.table(meta::SCHEMA_TABLE).unwrap();

    schema
        .insert(
            &db,
            Data::new()
                .with("name", "broken")
                .with("fields", "not json"),
        )
        .await
        .unwrap();

    let err = db.load_schema().await.unwrap_err();
    assert!(err.is_invalid_schema());
    assert!(err.to_string().contains("fields of `broken`"));
}

#[tokio::test]
async fn drop_table_removes_storage_and_hooks() {
    let (db, _log) = setup().await;

    table_with(
        "organisation",
        &[("name", "string")],
        settings(serde_json::json!({
            "components": {
                "offices": { "table": "office", "joinby": "organisation" },
            },
        })),
    )
    .create(&db, vec![Data::new().with("name", "Acme")])
    .await
    .unwrap();
    db.reload_schema().await.unwrap();

    let organisation = db.table("organisation").unwrap();
    db.drop_table("organisation").await.unwrap();

    assert!(db.table("organisation").is_none());
    assert!(!db.components().unwrap().has_parent("office"));

    let err = organisation.count(&db, None).await.unwrap_err();
    assert!(err.is_driver_operation_failed());

    let err = db.drop_table("organisation").await.unwrap_err();
    assert!(err.is_table_not_found());
}

#[tokio::test]
async fn object_type_components() {
    let (db, _log) = setup().await;

    table_with(
        "contact",
        &[("name", "string")],
        settings(serde_json::json!({
            "types": { "party": "party_id" },
            "components": {
                "addresses": { "table": "address", "pkey": "party_id", "joinby": "owner" },
            },
        })),
    )
    .create(&db, vec![])
    .await
    .unwrap();
    table_with(
        "person",
        &[("name", "string")],
        settings(serde_json::json!({ "types": { "party": "id" } })),
    )
    .create(&db, vec![])
    .await
    .unwrap();

    db.reload_schema().await.unwrap();
    assert_eq!(db.instance_tables("party").len(), 2);

    let person = db.table("person").unwrap();
    let hook = db.components().unwrap().component(&person, "addresses").unwrap();
    assert_eq!(hook.pkey, meta::OBJECT_KEY);
    assert_eq!(hook.fkey.as_deref(), Some("owner"));

    db.drop_table("contact").await.unwrap();
    assert!(db.components().unwrap().component(&person, "addresses").is_some());

    db.drop_table("person").await.unwrap();
    assert!(db.components().unwrap().is_empty());
}
