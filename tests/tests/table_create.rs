use outpost_core::{
    schema::meta,
    stmt::{Data, Direction, SelectOptions, Value},
};
use tests::{setup, table};

use pretty_assertions::assert_eq;

#[tokio::test]
async fn create_and_populate() {
    let (db, log) = setup().await;

    let office = table("office", &[("name", "string"), ("staff", "integer")])
        .create(
            &db,
            vec![
                Data::new().with("name", "Main").with("staff", 12),
                Data::new().with("name", "Annex"),
            ],
        )
        .await
        .unwrap();

    let sql = log.sql();
    assert_eq!(sql.len(), 5);
    assert_eq!(sql[0], r#"DROP TABLE IF EXISTS "office";"#);
    assert!(sql[1].starts_with(r#"CREATE TABLE IF NOT EXISTS "office" ("#));
    assert!(sql[2].starts_with(r#"INSERT INTO "em_schema" "#));
    assert!(sql[3].starts_with(r#"INSERT INTO "office" "#));
    assert!(sql[4].starts_with(r#"INSERT INTO "office" "#));

    assert!(db.table("office").is_some());
    assert_eq!(office.count(&db, None).await.unwrap(), 2);

    let options = SelectOptions::default().order_by(office.column("id").unwrap(), Direction::Asc);
    let rows = office.select(&db, vec![], options).await.unwrap();

    let main = rows[0].clone().into_data("office");
    assert_eq!(main["id"], Value::Integer(1));
    assert_eq!(main["name"], Value::from("Main"));
    assert_eq!(main["staff"], Value::Integer(12));
    assert_eq!(main["uuid"].as_str().unwrap().len(), 36);
    assert!(matches!(main["created_on"], Value::DateTime(_)));
    assert!(matches!(main["modified_on"], Value::DateTime(_)));
    assert_eq!(main["synchronized_on"], Value::Null);

    let annex = rows[1].clone().into_data("office");
    assert_eq!(annex["staff"], Value::Null);
    assert_ne!(annex["uuid"], main["uuid"]);
}

#[tokio::test]
async fn create_persists_schema() {
    let (db, _log) = setup().await;
    let schema = db.table(meta::SCHEMA_TABLE).unwrap();

    table("office", &[("name", "string")])
        .create(&db, vec![])
        .await
        .unwrap();

    assert_eq!(schema.count(&db, None).await.unwrap(), 3);

    let name = schema.field("name").unwrap();
    let office = schema.filter(name.equals("office"));
    let rows = office
        .select(&db, vec![], SelectOptions::default())
        .await
        .unwrap();

    let data = rows[0].clone().into_data(meta::SCHEMA_TABLE);
    assert_eq!(
        data["fields"],
        Value::Json(serde_json::json!({ "name": { "type": "string" } }))
    );
    assert_eq!(data["settings"], Value::Json(serde_json::json!({})));
}

#[tokio::test]
async fn recreate_drops_rows() {
    let (db, _log) = setup().await;

    let office = table("office", &[("name", "string")])
        .create(&db, vec![Data::new().with("name", "Main")])
        .await
        .unwrap();
    assert_eq!(office.count(&db, None).await.unwrap(), 1);

    let office = table("office", &[("name", "string")])
        .create(&db, vec![])
        .await
        .unwrap();
    assert_eq!(office.count(&db, None).await.unwrap(), 0);
}

#[tokio::test]
async fn populate_without_records_touches_nothing() {
    let (db, mut log) = setup().await;

    let office = table("office", &[("name", "string")])
        .create(&db, vec![])
        .await
        .unwrap();

    log.clear();
    office.populate(&db, vec![]).await.unwrap();
    assert!(log.is_empty());

    office
        .populate(&db, vec![Data::new().with("name", "Main")])
        .await
        .unwrap();
    assert!(log.has_batch());
    assert_eq!(office.count(&db, None).await.unwrap(), 1);
}
